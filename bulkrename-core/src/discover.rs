use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::RunOptions;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("invalid target path: {} is not a file or directory", .0.display())]
    InvalidTarget(PathBuf),
}

/// Gather candidate paths for the planner: a single file as-is, otherwise a
/// flat or recursive directory listing filtered by extension. Sorted by path
/// so the preview numbering is deterministic.
pub fn discover(options: &RunOptions) -> Result<Vec<PathBuf>> {
    let target = &options.target;

    if target.is_file() {
        return Ok(vec![target.clone()]);
    }

    if !target.is_dir() {
        return Err(DiscoverError::InvalidTarget(target.clone()).into());
    }

    let mut candidates = Vec::new();
    if options.recursive {
        for entry in WalkDir::new(target) {
            let entry = entry
                .with_context(|| format!("Failed to walk directory: {}", target.display()))?;
            if entry.file_type().is_file() {
                candidates.push(entry.into_path());
            }
        }
    } else {
        let entries = fs::read_dir(target)
            .with_context(|| format!("Failed to read directory: {}", target.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read directory: {}", target.display()))?;
            let path = entry.path();
            if path.is_file() {
                candidates.push(path);
            }
        }
    }

    if let Some(extension) = &options.extension {
        candidates.retain(|path| {
            path.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        });
    }

    candidates.sort();
    Ok(candidates)
}
