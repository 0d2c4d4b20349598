use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to do with a data row that does not have exactly two columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Fail the whole file.
    #[default]
    Reject,
    /// Drop the row, record a diagnostic and keep going.
    Skip,
}

/// Options for reading one tabular rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: u8,
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            delimiter: b',',
            malformed_rows: MalformedRowPolicy::Reject,
        }
    }
}

/// One data row split into its category token and value, both verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    /// 1-based line number the row starts on.
    pub line: u64,
    pub category: String,
    pub value: String,
}
