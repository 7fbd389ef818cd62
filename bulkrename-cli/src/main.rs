use anyhow::{bail, Result};
use bulkrename_core::{
    parse_inline, rename_operation, BackupTiming, DiscoverError, EditAction, PositionEdit,
    RuleError, RulePair, RunOptions, StdinConfirmer,
};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

mod cli;

use cli::Cli;

fn main() {
    // SIGINT stops the batch between operations instead of mid-rename.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        eprintln!("\nReceived SIGINT. Finishing the current operation...");
        interrupted_clone.store(true, Ordering::SeqCst);
    })
    .expect("Error setting SIGINT handler");

    let cli = Cli::parse();
    let use_color = !cli.no_color && io::stdout().is_terminal();

    let options = build_options(cli, use_color).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        process::exit(2);
    });

    let mut confirmer = StdinConfirmer;
    match rename_operation(&options, &mut confirmer, interrupted.as_ref()) {
        Ok(report) => {
            print!("{}", report.format_summary());
            process::exit(0);
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(exit_code_for(&e));
        },
    }
}

/// 2 for input the operator has to correct (rule documents, inline specs,
/// target path), 3 for everything else.
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<RuleError>().is_some() || err.downcast_ref::<DiscoverError>().is_some() {
        2
    } else {
        3
    }
}

/// Fold the parsed arguments into the single immutable run configuration.
fn build_options(cli: Cli, use_color: bool) -> Result<RunOptions> {
    let position_edit = match (cli.position, cli.delete, cli.add) {
        (Some(position), Some(count), None) => Some(PositionEdit {
            position,
            action: EditAction::Delete(count),
            from_end: cli.reverse,
        }),
        (Some(position), None, Some(text)) => Some(PositionEdit {
            position,
            action: EditAction::Insert(text),
            from_end: cli.reverse,
        }),
        (Some(_), None, None) => {
            bail!("invalid arguments: --position requires --delete or --add")
        },
        // --delete/--add without --position is rejected by the parser.
        _ => None,
    };

    let mut inline_pairs: Vec<RulePair> = Vec::new();
    for spec in &cli.replace {
        inline_pairs.extend(parse_inline(spec)?);
    }

    let extension = cli
        .extension
        .map(|ext| ext.trim_start_matches('.').to_lowercase());

    let backup = if cli.backup {
        Some(if cli.backup_before {
            BackupTiming::BeforeExecution
        } else {
            BackupTiming::AfterExecution
        })
    } else {
        None
    };

    Ok(RunOptions {
        target: cli.path,
        rules_dir: cli.rules_dir,
        backup_dir: cli.backup_dir,
        rule_documents: cli.rules,
        inline_pairs,
        extension,
        use_expressions: cli.expressions,
        recursive: cli.recursive,
        step: cli.step,
        verbose: cli.verbose,
        backup,
        delay_secs: cli.delay,
        position_edit,
        whitespace: cli.whitespace,
        assume_yes: cli.yes,
        dry_run: cli.dry_run,
        use_color,
    })
}
