use std::path::PathBuf;

use crate::rules::RulePair;

/// When the backup manifest is written relative to execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupTiming {
    /// Record the planned batch before any rename is attempted.
    BeforeExecution,
    /// Record after the batch has run, reflecting the batch as attempted.
    AfterExecution,
}

/// A position-based character edit applied to the stem after all rule
/// categories have run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionEdit {
    /// Character offset into the stem (0-based).
    pub position: usize,
    pub action: EditAction,
    /// Count `position` from the end of the stem instead of the start.
    pub from_end: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Delete this many characters starting at the position.
    Delete(usize),
    /// Insert this string at the position.
    Insert(String),
}

/// Immutable configuration for a single run, constructed once from parsed
/// arguments and passed by reference into every component. No component
/// reads ambient process-wide state.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Target file or directory for renaming.
    pub target: PathBuf,
    /// Directory holding rule documents for auto-discovery.
    pub rules_dir: PathBuf,
    /// Directory manifests are written to.
    pub backup_dir: PathBuf,
    /// Explicitly selected rule documents, in argument order.
    pub rule_documents: Vec<PathBuf>,
    /// Ad-hoc pairs from the command line, applied after all documents.
    pub inline_pairs: Vec<RulePair>,
    /// Extension filter, normalized to lowercase without a leading dot.
    pub extension: Option<String>,
    /// Global regex toggle; a pair is only treated as a pattern when this
    /// and the category's own flag are both set.
    pub use_expressions: bool,
    pub recursive: bool,
    /// Prompt per category before planning.
    pub step: bool,
    pub verbose: bool,
    /// `None` disables backup recording entirely.
    pub backup: Option<BackupTiming>,
    /// Seconds to pause after each successful rename (validated 1..=60).
    pub delay_secs: Option<u64>,
    pub position_edit: Option<PositionEdit>,
    /// Replace the spaces remaining after normalization with this string.
    pub whitespace: Option<String>,
    /// Skip the confirmation gate.
    pub assume_yes: bool,
    /// Plan and preview only; never mutate the filesystem.
    pub dry_run: bool,
    pub use_color: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            target: PathBuf::from("."),
            rules_dir: PathBuf::from("bulkrename_rules"),
            backup_dir: PathBuf::from("bulkrename_backups"),
            rule_documents: Vec::new(),
            inline_pairs: Vec::new(),
            extension: None,
            use_expressions: false,
            recursive: false,
            step: false,
            verbose: false,
            backup: None,
            delay_secs: None,
            position_edit: None,
            whitespace: None,
            assume_yes: false,
            dry_run: false,
            use_color: false,
        }
    }
}
