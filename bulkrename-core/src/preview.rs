use anyhow::Result;
use nu_ansi_term::Color as AnsiColor;
use std::fmt::Write;
use std::path::Path;

use crate::planner::RenameOp;
use crate::prompt::Confirm;

/// Whether the operator approved the previewed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Cancelled,
    /// Empty batch: nothing to show, nothing to ask.
    NothingToDo,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Render the full proposed batch, numbered 1-based with the index padded to
/// the digit count of the batch size.
pub fn render_preview(operations: &[RenameOp], use_color: bool) -> String {
    let mut output = String::new();
    let width = operations.len().to_string().len();
    let rule = "=".repeat(width + 50);

    if use_color {
        writeln!(
            output,
            "{}",
            AnsiColor::Cyan.bold().paint("PREVIEW OF CHANGES:")
        )
        .unwrap();
    } else {
        writeln!(output, "PREVIEW OF CHANGES:").unwrap();
    }
    writeln!(output, "{rule}").unwrap();

    for (idx, op) in operations.iter().enumerate() {
        let old_name = display_name(&op.original);
        let new_name = display_name(&op.proposed);
        if use_color {
            writeln!(
                output,
                "[{:>width$}] {} -> {}",
                idx + 1,
                old_name,
                AnsiColor::Green.paint(new_name),
            )
            .unwrap();
        } else {
            writeln!(output, "[{:>width$}] {} -> {}", idx + 1, old_name, new_name).unwrap();
        }
    }

    writeln!(output, "{rule}").unwrap();
    output
}

/// The confirmation gate: print the preview and require an explicit
/// affirmative response before any filesystem mutation. Partial confirmation
/// is not supported; anything but yes cancels the entire batch.
pub fn confirm_batch(
    operations: &[RenameOp],
    confirmer: &mut dyn Confirm,
    use_color: bool,
) -> Result<GateDecision> {
    if operations.is_empty() {
        println!("INFO: No files to process.");
        return Ok(GateDecision::NothingToDo);
    }

    println!("{}", render_preview(operations, use_color));

    if confirmer.confirm("Proceed with these changes? [y/N]: ")? {
        Ok(GateDecision::Proceed)
    } else {
        println!("INFO: Operation cancelled by the operator.");
        Ok(GateDecision::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct Scripted(bool);

    impl Confirm for Scripted {
        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            Ok(self.0)
        }
    }

    struct Unreachable;

    impl Confirm for Unreachable {
        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            panic!("the gate must not prompt for an empty batch");
        }
    }

    fn op(old: &str, new: &str) -> RenameOp {
        RenameOp {
            original: PathBuf::from(old),
            proposed: PathBuf::from(new),
        }
    }

    #[test]
    fn test_preview_numbering_and_names() {
        let ops: Vec<RenameOp> = (1..=12)
            .map(|i| op(&format!("dir/old{i}.txt"), &format!("dir/new{i}.txt")))
            .collect();

        let rendered = render_preview(&ops, false);
        // Two-digit batch, so single-digit indices are padded.
        assert!(rendered.contains("[ 1] old1.txt -> new1.txt"));
        assert!(rendered.contains("[12] old12.txt -> new12.txt"));
        assert!(!rendered.contains("dir/"));
    }

    #[test]
    fn test_preview_shows_every_operation() {
        let ops = vec![op("a.txt", "b.txt"), op("c.txt", "d.txt")];
        let rendered = render_preview(&ops, false);
        assert!(rendered.contains("a.txt -> b.txt"));
        assert!(rendered.contains("c.txt -> d.txt"));
    }

    #[test]
    fn test_empty_batch_short_circuits_without_prompting() {
        let decision = confirm_batch(&[], &mut Unreachable, false).unwrap();
        assert_eq!(decision, GateDecision::NothingToDo);
    }

    #[test]
    fn test_affirmative_proceeds() {
        let ops = vec![op("a.txt", "b.txt")];
        let decision = confirm_batch(&ops, &mut Scripted(true), false).unwrap();
        assert_eq!(decision, GateDecision::Proceed);
    }

    #[test]
    fn test_anything_else_cancels_the_whole_batch() {
        let ops = vec![op("a.txt", "b.txt")];
        let decision = confirm_batch(&ops, &mut Scripted(false), false).unwrap();
        assert_eq!(decision, GateDecision::Cancelled);
    }
}
