//! Reading tabular rule files
//!
//! A file goes through two stages: [`RowClassifier`] turns raw CSV into
//! `(category, value)` rows, and [`RuleSetBuilder`] folds those rows into a
//! [`RuleSet`](crate::models::RuleSet). [`parse_rule_set`] runs both.

pub mod builder;
pub mod classifier;
pub mod diagnostics;
pub mod ruleset;
pub mod types;

pub use builder::{build_rule_set, RuleSetBuilder};
pub use classifier::RowClassifier;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use ruleset::parse_rule_set;
pub use types::{ClassifiedRow, MalformedRowPolicy, ParseOptions};
