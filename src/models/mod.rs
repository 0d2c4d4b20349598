//! Core data models for the application
//!
//! This module contains the rule-set structures produced by the parser and
//! consumed by the encoders, separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use csv2srs::models::{PlainRuleSet, RuleCategory, RuleSet};
//!
//! let mut rule_set = RuleSet::new();
//! rule_set.push(RuleCategory::Domain, "example.com".to_string());
//!
//! // Everything collected from one file becomes a single rule
//! let plain = PlainRuleSet::from(rule_set);
//! assert_eq!(plain.rules.len(), 1);
//! ```

pub mod ruleset;

pub use ruleset::*;
