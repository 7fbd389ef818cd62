use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::planner::RenameOp;
use crate::rules::RuleSet;

/// Write one manifest for this run: the full effective rule set, then every
/// `old -> new` pair in batch order. Renaming is not transactional with the
/// manifest; a write failure here is reported by the caller and never rolls
/// anything back.
pub fn record_manifest(
    backup_dir: &Path,
    operations: &[RenameOp],
    rules: &RuleSet,
) -> Result<PathBuf> {
    fs::create_dir_all(backup_dir).with_context(|| {
        format!(
            "Failed to create backup directory: {}",
            backup_dir.display()
        )
    })?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H%M%S");
    let path = backup_dir.join(format!("{timestamp}_bulkrename_backup.txt"));

    let mut content =
        serde_json::to_string_pretty(rules).context("Failed to serialize rule set")?;
    content.push_str("\n\n");
    for op in operations {
        content.push_str(&format!(
            "{} -> {}\n",
            op.original.display(),
            op.proposed.display()
        ));
    }

    fs::write(&path, content)
        .with_context(|| format!("Failed to write backup manifest: {}", path.display()))?;

    Ok(path)
}
