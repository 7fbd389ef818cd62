use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::{EditAction, PositionEdit, RunOptions};
use crate::rules::RuleSet;

/// A single proposed rename. Paths that would not change are never planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOp {
    pub original: PathBuf,
    pub proposed: PathBuf,
}

/// The planned batch plus the non-fatal diagnostics produced while planning
/// (malformed patterns, empty targets, collision drops). A diagnostic never
/// aborts the batch.
#[derive(Debug, Default)]
pub struct PlanOutcome {
    pub operations: Vec<RenameOp>,
    pub diagnostics: Vec<String>,
}

/// One rule pair with its pattern compiled up front. A malformed pattern is
/// reported once and the pair becomes inert for the whole batch.
enum CompiledPair<'a> {
    Literal { from: &'a str, to: &'a str },
    Pattern { regex: Regex, to: &'a str },
    Inert,
}

/// Compute the proposed batch for `paths`, applying every category in rule
/// set order and every pair in category order to each file's stem. The stem
/// produced by one pair feeds the next, so transformations compose
/// left-to-right across the whole rule set.
pub fn plan(paths: &[PathBuf], rules: &RuleSet, options: &RunOptions) -> PlanOutcome {
    let mut outcome = PlanOutcome::default();

    // An empty rule set with no layered transforms plans nothing, even for
    // names the normalization pass alone would have cleaned up.
    if rules.is_empty() && options.position_edit.is_none() && options.whitespace.is_none() {
        return outcome;
    }

    let compiled = compile_rules(rules, options, &mut outcome.diagnostics);

    // First proposal to claim a destination keeps it; later collisions are
    // dropped from the batch and reported.
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for path in paths {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            outcome
                .diagnostics
                .push(format!("skipping non-UTF-8 file name: {}", path.display()));
            continue;
        };

        let (stem, extension) = split_name(name);
        let mut stem = stem.to_string();

        for pair in &compiled {
            stem = apply_pair(&stem, pair);
        }

        if let Some(edit) = &options.position_edit {
            stem = apply_position_edit(&stem, edit);
        }

        stem = normalize_whitespace(&stem);
        if let Some(replacement) = &options.whitespace {
            stem = stem.replace(' ', replacement);
        }

        let new_name = format!("{stem}{extension}");
        if new_name == name {
            continue;
        }

        let proposed = path
            .parent()
            .map_or_else(|| PathBuf::from(&new_name), |dir| dir.join(&new_name));

        if !claimed.insert(proposed.clone()) {
            outcome.diagnostics.push(format!(
                "collision: '{}' also resolves to '{}', dropping it from the batch",
                name, new_name
            ));
            continue;
        }

        outcome.operations.push(RenameOp {
            original: path.clone(),
            proposed,
        });
    }

    outcome
}

/// Flatten the rule set into compiled pairs, preserving category and pair
/// order. Empty targets and malformed patterns are reported here, once,
/// rather than per file.
fn compile_rules<'a>(
    rules: &'a RuleSet,
    options: &RunOptions,
    diagnostics: &mut Vec<String>,
) -> Vec<CompiledPair<'a>> {
    let mut compiled = Vec::new();

    for category in &rules.categories {
        for pair in &category.pairs {
            if pair.from.trim().is_empty() {
                diagnostics.push(format!(
                    "skipping empty target in category '{}'",
                    category.name
                ));
                compiled.push(CompiledPair::Inert);
                continue;
            }

            let entry = if options.use_expressions && category.use_expressions {
                match Regex::new(&pair.from) {
                    Ok(regex) => CompiledPair::Pattern {
                        regex,
                        to: &pair.to,
                    },
                    Err(e) => {
                        diagnostics.push(format!(
                            "invalid pattern '{}' in category '{}': {}",
                            pair.from, category.name, e
                        ));
                        CompiledPair::Inert
                    },
                }
            } else {
                CompiledPair::Literal {
                    from: &pair.from,
                    to: &pair.to,
                }
            };
            compiled.push(entry);
        }
    }

    compiled
}

fn apply_pair(stem: &str, pair: &CompiledPair<'_>) -> String {
    match pair {
        CompiledPair::Literal { from, to } => {
            if stem.contains(from) {
                stem.replace(from, to)
            } else {
                stem.to_string()
            }
        },
        CompiledPair::Pattern { regex, to } => {
            // A non-matching pattern is a no-op for this pair, not an error.
            if regex.is_match(stem) {
                regex.replace_all(stem, *to).into_owned()
            } else {
                stem.to_string()
            }
        },
        CompiledPair::Inert => stem.to_string(),
    }
}

/// Split a file name into a stem and its final extension (the substring from
/// the last `.` onward). A leading dot alone does not start an extension, so
/// dotfiles keep their full name as the stem.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Collapse whitespace runs to a single space and trim the ends.
pub fn normalize_whitespace(stem: &str) -> String {
    stem.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-based insert/delete at a fixed offset, clamped to the stem.
fn apply_position_edit(stem: &str, edit: &PositionEdit) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let len = chars.len();
    let pos = if edit.from_end {
        len.saturating_sub(edit.position)
    } else {
        edit.position.min(len)
    };

    match &edit.action {
        EditAction::Delete(count) => {
            let end = pos.saturating_add(*count).min(len);
            let mut out: String = chars[..pos].iter().collect();
            out.extend(&chars[end..]);
            out
        },
        EditAction::Insert(text) => {
            let mut out: String = chars[..pos].iter().collect();
            out.push_str(text);
            out.extend(&chars[pos..]);
            out
        },
    }
}

/// Re-apply the filesystem-safety normalization to a proposed path's file
/// name. The executor calls this just before renaming in case the proposal
/// was tampered with between plan and execution.
pub fn normalize_proposed(proposed: &Path) -> PathBuf {
    let Some(name) = proposed.file_name().and_then(|n| n.to_str()) else {
        return proposed.to_path_buf();
    };
    let (stem, extension) = split_name(name);
    let cleaned = format!("{}{}", normalize_whitespace(stem), extension);
    proposed
        .parent()
        .map_or_else(|| PathBuf::from(&cleaned), |dir| dir.join(&cleaned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{RuleCategory, RulePair};

    fn category(name: &str, pairs: &[(&str, &str)], use_expressions: bool) -> RuleCategory {
        RuleCategory {
            name: name.to_string(),
            pairs: pairs
                .iter()
                .map(|(from, to)| RulePair {
                    from: (*from).to_string(),
                    to: (*to).to_string(),
                })
                .collect(),
            use_expressions,
        }
    }

    fn rule_set(categories: Vec<RuleCategory>) -> RuleSet {
        RuleSet { categories }
    }

    fn plan_names(names: &[&str], rules: &RuleSet, options: &RunOptions) -> PlanOutcome {
        let paths: Vec<PathBuf> = names.iter().map(|n| PathBuf::from(format!("dir/{n}"))).collect();
        plan(&paths, rules, options)
    }

    #[test]
    fn test_draft_report_scenario() {
        let rules = rule_set(vec![category("demo", &[("draft", "final")], false)]);
        let outcome = plan_names(&["draft report.txt"], &rules, &RunOptions::default());

        assert_eq!(outcome.operations.len(), 1);
        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/final report.txt")
        );
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_noop_rename_is_dropped() {
        let rules = rule_set(vec![category("demo", &[("missing", "x")], false)]);
        let outcome = plan_names(&["report.txt"], &rules, &RunOptions::default());
        assert!(outcome.operations.is_empty());
    }

    #[test]
    fn test_empty_rule_set_plans_nothing() {
        let outcome = plan_names(
            &["a.txt", "b.txt"],
            &RuleSet::default(),
            &RunOptions::default(),
        );
        assert!(outcome.operations.is_empty());
    }

    #[test]
    fn test_empty_rule_set_skips_normalization_too() {
        // Without rules or layered edits there is nothing to apply, so even
        // a messy name stays out of the batch.
        let outcome = plan_names(
            &["foo   bar   .txt"],
            &RuleSet::default(),
            &RunOptions::default(),
        );
        assert!(outcome.operations.is_empty());
    }

    #[test]
    fn test_rules_compose_left_to_right() {
        let rules = rule_set(vec![
            category("first", &[("a", "b")], false),
            category("second", &[("b", "c")], false),
        ]);
        let outcome = plan_names(&["a.txt"], &rules, &RunOptions::default());

        assert_eq!(outcome.operations[0].proposed, PathBuf::from("dir/c.txt"));
    }

    #[test]
    fn test_literal_mode_replaces_all_occurrences() {
        let rules = rule_set(vec![category("demo", &[("x", "y")], false)]);
        let outcome = plan_names(&["xax xbx.txt"], &rules, &RunOptions::default());

        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/yay yby.txt")
        );
    }

    #[test]
    fn test_regex_mode_requires_both_flags() {
        let rules = rule_set(vec![category("demo", &[(r"\d+", "N")], true)]);

        // Global flag off: the pattern is treated as a literal and misses.
        let outcome = plan_names(&["file123.txt"], &rules, &RunOptions::default());
        assert!(outcome.operations.is_empty());

        let options = RunOptions {
            use_expressions: true,
            ..RunOptions::default()
        };
        let outcome = plan_names(&["file123.txt"], &rules, &options);
        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/fileN.txt")
        );
    }

    #[test]
    fn test_category_flag_off_keeps_literal_interpretation() {
        let rules = rule_set(vec![category("demo", &[(r"\d+", "N")], false)]);
        let options = RunOptions {
            use_expressions: true,
            ..RunOptions::default()
        };

        let outcome = plan_names(&[r"a\d+b.txt"], &rules, &options);
        assert_eq!(outcome.operations[0].proposed, PathBuf::from("dir/aNb.txt"));
    }

    #[test]
    fn test_malformed_pattern_does_not_block_later_pairs() {
        let rules = rule_set(vec![category(
            "demo",
            &[("[unclosed", "x"), ("draft", "final")],
            true,
        )]);
        let options = RunOptions {
            use_expressions: true,
            ..RunOptions::default()
        };

        let outcome = plan_names(&["draft.txt"], &rules, &options);
        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/final.txt")
        );
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.contains("invalid pattern") && d.contains("[unclosed")));
    }

    #[test]
    fn test_empty_target_is_skipped_with_warning() {
        let rules = rule_set(vec![category(
            "demo",
            &[("", "oops"), ("draft", "final")],
            false,
        )]);
        let outcome = plan_names(&["draft.txt"], &rules, &RunOptions::default());

        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/final.txt")
        );
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.contains("empty target")));
    }

    #[test]
    fn test_whitespace_normalization() {
        let rules = rule_set(vec![category("demo", &[("-", " ")], false)]);
        let outcome = plan_names(&["foo - - bar.txt"], &rules, &RunOptions::default());

        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/foo bar.txt")
        );
    }

    #[test]
    fn test_whitespace_replacement_after_normalization() {
        let rules = rule_set(vec![category("demo", &[("draft", "final")], false)]);
        let options = RunOptions {
            whitespace: Some("_".to_string()),
            ..RunOptions::default()
        };

        let outcome = plan_names(&["draft   report.txt"], &rules, &options);
        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/final_report.txt")
        );
    }

    #[test]
    fn test_collision_first_wins_later_dropped() {
        let rules = rule_set(vec![category("demo", &[("draft", ""), ("copy", "")], false)]);
        let outcome = plan_names(
            &["draft report.txt", "copy report.txt"],
            &rules,
            &RunOptions::default(),
        );

        assert_eq!(outcome.operations.len(), 1);
        assert_eq!(
            outcome.operations[0].original,
            PathBuf::from("dir/draft report.txt")
        );
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.contains("collision") && d.contains("copy report.txt")));
    }

    #[test]
    fn test_position_delete() {
        let options = RunOptions {
            position_edit: Some(PositionEdit {
                position: 0,
                action: EditAction::Delete(3),
                from_end: false,
            }),
            ..RunOptions::default()
        };
        let outcome = plan_names(&["01 song.mp3"], &RuleSet::default(), &options);

        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/song.mp3")
        );
    }

    #[test]
    fn test_position_insert_reversed() {
        let options = RunOptions {
            position_edit: Some(PositionEdit {
                position: 0,
                action: EditAction::Insert(" (old)".to_string()),
                from_end: true,
            }),
            ..RunOptions::default()
        };
        let outcome = plan_names(&["report.txt"], &RuleSet::default(), &options);

        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/report (old).txt")
        );
    }

    #[test]
    fn test_position_edit_clamps_out_of_range() {
        let options = RunOptions {
            position_edit: Some(PositionEdit {
                position: 100,
                action: EditAction::Delete(5),
                from_end: false,
            }),
            ..RunOptions::default()
        };
        let outcome = plan_names(&["report.txt"], &RuleSet::default(), &options);
        assert!(outcome.operations.is_empty());
    }

    #[test]
    fn test_split_name_edge_cases() {
        assert_eq!(split_name("report.txt"), ("report", ".txt"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("README"), ("README", ""));
        assert_eq!(split_name(".bashrc"), (".bashrc", ""));
    }

    #[test]
    fn test_rules_touch_only_the_stem() {
        let rules = rule_set(vec![category("demo", &[("txt", "doc")], false)]);
        let outcome = plan_names(&["my txt file.txt"], &rules, &RunOptions::default());

        // The extension is reattached unchanged.
        assert_eq!(
            outcome.operations[0].proposed,
            PathBuf::from("dir/my doc file.txt")
        );
    }

    #[test]
    fn test_plan_is_deterministic() {
        let rules = rule_set(vec![category("demo", &[("draft", "final")], false)]);
        let first = plan_names(&["draft a.txt", "draft b.txt"], &rules, &RunOptions::default());
        let second = plan_names(&["draft a.txt", "draft b.txt"], &rules, &RunOptions::default());
        assert_eq!(first.operations, second.operations);
    }

    #[test]
    fn test_normalize_proposed() {
        let cleaned = normalize_proposed(Path::new("dir/foo   bar   .txt"));
        assert_eq!(cleaned, PathBuf::from("dir/foo bar.txt"));
    }
}
