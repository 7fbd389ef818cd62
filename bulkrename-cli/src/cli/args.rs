use clap::Parser;
use std::path::PathBuf;

/// Rule-driven batch renaming of files with preview and backup
#[derive(Parser, Debug)]
#[command(name = "bulkrename")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Target path for renaming operations (file or directory)
    #[arg(short, long, value_name = "PATH")]
    pub path: PathBuf,

    /// Inline replacement pairs in "{target,replacement}" format (repeatable)
    #[arg(short = 'l', long = "replace", value_name = "SPEC")]
    pub replace: Vec<String>,

    /// Rule documents in the rules directory (comma-separated file names).
    /// Every *.json document in the rules directory is loaded as well,
    /// after the ones named here.
    #[arg(short = 'j', long = "rules", value_delimiter = ',', value_name = "FILE")]
    pub rules: Vec<PathBuf>,

    /// Only process files with this extension (leading dot optional)
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Interpret pairs in regex-flagged categories as regular expressions
    #[arg(short = 'x', long = "expressions")]
    pub expressions: bool,

    /// Recursively process directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Prompt for each rule category before planning
    #[arg(short, long)]
    pub step: bool,

    /// Write a backup manifest of the rule set and every rename
    #[arg(short = 'k', long)]
    pub backup: bool,

    /// Record the manifest before execution instead of after
    #[arg(long, requires = "backup")]
    pub backup_before: bool,

    /// Seconds to wait between renaming operations (1-60)
    #[arg(short = 't', long = "delay", value_name = "SECS",
          value_parser = clap::value_parser!(u64).range(1..=60))]
    pub delay: Option<u64>,

    /// Character position for add/delete operations (0-based)
    #[arg(short = 'c', long, value_name = "NUM")]
    pub position: Option<usize>,

    /// Delete this many characters at the position
    #[arg(short = 'd', long, value_name = "NUM", requires = "position", conflicts_with = "add")]
    pub delete: Option<usize>,

    /// Insert this string at the position
    #[arg(short = 'a', long, value_name = "STRING", requires = "position")]
    pub add: Option<String>,

    /// Count the position from the end of the stem instead of the start
    #[arg(long, requires = "position")]
    pub reverse: bool,

    /// Replace the whitespace remaining after normalization with this string
    #[arg(short = 'w', long, value_name = "STRING")]
    pub whitespace: Option<String>,

    /// Skip the confirmation prompt and apply immediately
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// More output messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Directory searched for rule documents
    #[arg(long, default_value = "bulkrename_rules", value_name = "DIR")]
    pub rules_dir: PathBuf,

    /// Directory backup manifests are written to
    #[arg(long, default_value = "bulkrename_backups", value_name = "DIR")]
    pub backup_dir: PathBuf,

    /// Plan and preview only, without renaming anything
    #[arg(long)]
    pub dry_run: bool,
}
