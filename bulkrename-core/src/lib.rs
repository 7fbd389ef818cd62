#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod backup;
pub mod config;
pub mod discover;
pub mod executor;
pub mod operations;
pub mod planner;
pub mod preview;
pub mod prompt;
pub mod rules;

pub use backup::record_manifest;
pub use config::{BackupTiming, EditAction, PositionEdit, RunOptions};
pub use discover::{discover, DiscoverError};
pub use executor::{execute, ExecutionResult, Outcome};
pub use operations::{rename_operation, RenameReport};
pub use planner::{plan, PlanOutcome, RenameOp};
pub use preview::{confirm_batch, render_preview, GateDecision};
pub use prompt::{Confirm, StdinConfirmer};
pub use rules::{discover_documents, parse_inline, RuleCategory, RuleError, RulePair, RuleSet};
