use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use crate::backup::record_manifest;
use crate::config::{BackupTiming, RunOptions};
use crate::discover::discover;
use crate::executor::{execute, ExecutionResult, Outcome};
use crate::planner::plan;
use crate::preview::{confirm_batch, render_preview, GateDecision};
use crate::prompt::Confirm;
use crate::rules::{discover_documents, RuleError, RuleSet};

/// Structured result of one engine run.
#[derive(Debug, Default)]
pub struct RenameReport {
    pub planned: usize,
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub manifest: Option<PathBuf>,
    pub results: Vec<ExecutionResult>,
}

impl RenameReport {
    fn from_results(results: Vec<ExecutionResult>, manifest: Option<PathBuf>) -> Self {
        let planned = results.len();
        let renamed = results
            .iter()
            .filter(|r| r.outcome == Outcome::Renamed)
            .count();
        let skipped = results
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Skipped(_)))
            .count();
        let failed = results
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Failed(_)))
            .count();
        Self {
            planned,
            renamed,
            skipped,
            failed,
            cancelled: false,
            manifest,
            results,
        }
    }

    pub fn format_summary(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();

        if self.cancelled {
            output.push_str("Cancelled: no files were renamed.\n");
            return output;
        }

        writeln!(
            output,
            "Renamed {} of {} planned file(s).",
            self.renamed, self.planned
        )
        .unwrap();
        if self.skipped > 0 {
            writeln!(output, "Skipped: {}", self.skipped).unwrap();
        }
        if self.failed > 0 {
            writeln!(output, "Failed: {}", self.failed).unwrap();
        }
        if let Some(manifest) = &self.manifest {
            writeln!(output, "Backup manifest: {}", manifest.display()).unwrap();
        }

        output
    }
}

/// Resolve the rule documents for this run: explicit selections in argument
/// order, then every auto-discovered document in the rules directory that
/// was not explicitly named, in file-name order.
fn resolve_documents(options: &RunOptions) -> Result<Vec<PathBuf>> {
    if !options.rules_dir.exists() {
        fs::create_dir_all(&options.rules_dir)?;
        println!(
            "INFO: Created rules directory {}.",
            options.rules_dir.display()
        );
        if options.rule_documents.is_empty() && options.inline_pairs.is_empty() {
            return Err(RuleError::NoDocuments(options.rules_dir.clone()).into());
        }
    }

    let mut documents: Vec<PathBuf> = options
        .rule_documents
        .iter()
        .map(|name| options.rules_dir.join(name))
        .collect();

    for discovered in discover_documents(&options.rules_dir)? {
        if !documents.contains(&discovered) {
            documents.push(discovered);
        }
    }

    Ok(documents)
}

/// Run the whole pipeline once: load rules, filter, plan, preview, execute,
/// record. Data flows strictly forward; no stage is re-entered.
pub fn rename_operation(
    options: &RunOptions,
    confirmer: &mut dyn Confirm,
    interrupted: &AtomicBool,
) -> Result<RenameReport> {
    // Rule loading failures are always fatal; a half-loaded rule set is
    // unsafe to apply silently.
    let documents = resolve_documents(options)?;
    let mut rules = RuleSet::load_documents(&documents)?;
    rules.push_inline_pairs(options.inline_pairs.clone());

    if options.verbose {
        println!(
            "INFO: Loaded {} categories with {} pair(s) from {} document(s).",
            rules.categories.len(),
            rules.pair_count(),
            documents.len()
        );
    }

    if options.step {
        rules = rules.filter_categories(confirmer)?;
        if options.verbose {
            println!("INFO: {} categories kept.", rules.categories.len());
        }
    }

    let candidates = discover(options)?;
    if options.verbose {
        println!("INFO: Found {} file(s) to process.", candidates.len());
    }

    let outcome = plan(&candidates, &rules, options);
    for diagnostic in &outcome.diagnostics {
        eprintln!("WARNING: {diagnostic}");
    }

    if options.dry_run {
        if outcome.operations.is_empty() {
            println!("INFO: No files to process.");
        } else {
            println!("{}", render_preview(&outcome.operations, options.use_color));
            println!("INFO: Dry run, nothing renamed.");
        }
        return Ok(RenameReport {
            planned: outcome.operations.len(),
            ..RenameReport::default()
        });
    }

    if options.assume_yes {
        if outcome.operations.is_empty() {
            println!("INFO: No files to process.");
            return Ok(RenameReport::default());
        }
        println!("{}", render_preview(&outcome.operations, options.use_color));
    } else {
        match confirm_batch(&outcome.operations, confirmer, options.use_color)? {
            GateDecision::Proceed => {},
            GateDecision::NothingToDo => return Ok(RenameReport::default()),
            GateDecision::Cancelled => {
                return Ok(RenameReport {
                    cancelled: true,
                    ..RenameReport::default()
                })
            },
        }
    }

    let mut manifest = None;
    if options.backup == Some(BackupTiming::BeforeExecution) {
        manifest = write_manifest(options, &outcome.operations, &rules);
    }

    let results = execute(&outcome.operations, options, interrupted);

    if options.backup == Some(BackupTiming::AfterExecution) {
        manifest = write_manifest(options, &outcome.operations, &rules);
    }

    println!("INFO: Processing complete.");
    Ok(RenameReport::from_results(results, manifest))
}

/// A manifest write failure is reported but never rolls back completed
/// renames.
fn write_manifest(
    options: &RunOptions,
    operations: &[crate::planner::RenameOp],
    rules: &RuleSet,
) -> Option<PathBuf> {
    match record_manifest(&options.backup_dir, operations, rules) {
        Ok(path) => {
            println!("INFO: Backup completed {}.", path.display());
            Some(path)
        },
        Err(e) => {
            eprintln!("ERROR: Failed to write backup manifest: {e:#}");
            None
        },
    }
}
