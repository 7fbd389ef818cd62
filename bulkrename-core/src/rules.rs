use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::prompt::Confirm;

/// Name given to the synthetic category holding ad-hoc command-line pairs.
pub const INLINE_CATEGORY: &str = "inline";

/// Rule input the operator has to correct before a run can proceed.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("{} is not a JSON rule document", .0.display())]
    NotJson(PathBuf),
    #[error("invalid replacement spec '{0}', expected one or more {{from,to}} groups")]
    InvalidInlineSpec(String),
    #[error("no rule documents in {}; add rule documents or supply inline pairs", .0.display())]
    NoDocuments(PathBuf),
    #[error("Failed to read rule document: {}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse rule document: {}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single literal-or-pattern substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePair {
    pub from: String,
    pub to: String,
}

/// A named, ordered group of substitution pairs with its own literal/regex
/// mode. Pairs are only interpreted as patterns when the run's global
/// expression flag is also enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCategory {
    #[serde(rename = "category")]
    pub name: String,
    pub pairs: Vec<RulePair>,
    #[serde(rename = "regular_expressions", default)]
    pub use_expressions: bool,
}

/// An ordered collection of rule categories, merged from one or more
/// documents. Order is significant: document supply order, then declaration
/// order within each document. The merge is a concatenation, never a
/// de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(rename = "Replacements")]
    pub categories: Vec<RuleCategory>,
}

impl RuleSet {
    /// Load and merge rule documents in the order given. Any unreadable or
    /// structurally invalid document is a fatal error: a half-loaded rule
    /// set could silently mis-rename files.
    pub fn load_documents(paths: &[PathBuf]) -> Result<Self> {
        let mut merged = Self::default();

        for path in paths {
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                return Err(RuleError::NotJson(path.clone()).into());
            }

            let content = fs::read_to_string(path).map_err(|source| RuleError::Unreadable {
                path: path.clone(),
                source,
            })?;
            let document: Self =
                serde_json::from_str(&content).map_err(|source| RuleError::Malformed {
                    path: path.clone(),
                    source,
                })?;

            merged.categories.extend(document.categories);
        }

        Ok(merged)
    }

    /// Append a synthetic literal-mode category for ad-hoc pairs, after all
    /// document categories.
    pub fn push_inline_pairs(&mut self, pairs: Vec<RulePair>) {
        if pairs.is_empty() {
            return;
        }
        self.categories.push(RuleCategory {
            name: INLINE_CATEGORY.to_string(),
            pairs,
            use_expressions: false,
        });
    }

    /// Step mode: ask the operator about every category, in load order, and
    /// keep only the accepted ones. One blocking prompt per category.
    pub fn filter_categories(self, confirmer: &mut dyn Confirm) -> Result<Self> {
        let mut kept = Vec::with_capacity(self.categories.len());
        for category in self.categories {
            let prompt = format!("Include category '{}'? [y/N]: ", category.name);
            if confirmer.confirm(&prompt)? {
                kept.push(category);
            }
        }
        Ok(Self { categories: kept })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.categories.iter().map(|c| c.pairs.len()).sum()
    }
}

/// Find every `*.json` document in the rules directory, sorted by file name
/// so the merge order is deterministic.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read rules directory: {}", dir.display()))?;

    let mut documents = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read rules directory: {}", dir.display()))?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

/// Parse an inline replacement spec of the form `{from,to}{from2,to2}...`.
/// A spec with no well-formed group is a fatal error.
pub fn parse_inline(spec: &str) -> Result<Vec<RulePair>> {
    // Same group syntax the original flag surface used: braces, one comma.
    let group = Regex::new(r"\{([^{},]*),([^{},]*)\}").expect("inline spec regex is valid");

    let pairs: Vec<RulePair> = group
        .captures_iter(spec)
        .map(|caps| RulePair {
            from: caps[1].to_string(),
            to: caps[2].to_string(),
        })
        .collect();

    if pairs.is_empty() {
        return Err(RuleError::InvalidInlineSpec(spec.to_string()).into());
    }
    Ok(pairs)
}
