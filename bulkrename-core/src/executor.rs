use nu_ansi_term::Color as AnsiColor;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::config::RunOptions;
use crate::planner::{normalize_proposed, RenameOp};

/// Terminal outcome of one rename. There is no retry: Skipped and Failed
/// both close out their operation while the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Renamed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub original: PathBuf,
    pub new: PathBuf,
    pub outcome: Outcome,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Apply the confirmed batch strictly in planner order. A single file
/// failing or disappearing never aborts the remaining operations; the
/// interrupt flag stops the remainder cleanly between operations.
pub fn execute(
    operations: &[RenameOp],
    options: &RunOptions,
    interrupted: &AtomicBool,
) -> Vec<ExecutionResult> {
    let total = operations.len();
    let width = total.to_string().len().max(3);
    let mut results = Vec::with_capacity(total);

    for (idx, op) in operations.iter().enumerate() {
        if interrupted.load(Ordering::SeqCst) {
            eprintln!("INFO: Interrupted, stopping the remaining batch.");
            results.extend(operations[idx..].iter().map(|op| ExecutionResult {
                original: op.original.clone(),
                new: op.proposed.clone(),
                outcome: Outcome::Skipped("interrupted by operator".to_string()),
            }));
            break;
        }

        // Defensive re-clean in case the proposal was altered between plan
        // and execution.
        let destination = normalize_proposed(&op.proposed);

        let outcome = if !op.original.exists() {
            eprintln!(
                "ERROR: File not found {}, skipping.",
                file_name(&op.original)
            );
            Outcome::Skipped("file not found".to_string())
        } else if destination.exists() {
            eprintln!(
                "ERROR: Failed to rename {} to {}: destination already exists",
                file_name(&op.original),
                file_name(&destination)
            );
            Outcome::Failed("destination already exists".to_string())
        } else {
            match fs::rename(&op.original, &destination) {
                Ok(()) => Outcome::Renamed,
                Err(e) => {
                    eprintln!(
                        "ERROR: Failed to rename {} to {}: {}",
                        file_name(&op.original),
                        file_name(&destination),
                        e
                    );
                    Outcome::Failed(e.to_string())
                },
            }
        };

        let percentage = (idx + 1) * 100 / total;
        let line = format!(
            "[{:>width$}%] {} -> {}",
            percentage,
            file_name(&op.original),
            file_name(&destination),
        );
        if options.use_color && outcome == Outcome::Renamed {
            println!("{}", AnsiColor::Green.paint(line));
        } else {
            println!("{line}");
        }

        let renamed = outcome == Outcome::Renamed;
        results.push(ExecutionResult {
            original: op.original.clone(),
            new: destination,
            outcome,
        });

        if renamed {
            if let Some(secs) = options.delay_secs {
                thread::sleep(Duration::from_secs(secs));
            }
        }
    }

    results
}
