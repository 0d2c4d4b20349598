pub mod formats;

use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{is_supported_version, PlainRuleSet};

// Re-export format writers
pub use formats::binary::{read_rule_set, BinaryWriter};
pub use formats::source::SourceWriter;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("unsupported rule-set version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid rule-set data: {0}")]
    Corrupt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Serializes a rule set into an output artifact.
pub trait RuleSetWriter {
    /// File extension of the produced artifact, without the dot.
    fn extension(&self) -> &'static str;

    fn write(
        &self,
        writer: &mut dyn io::Write,
        rule_set: &PlainRuleSet,
        version: u8,
    ) -> Result<(), EncodeError>;
}

/// Output format selectable from the config file or command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact, compressed binary rule set (`.crs`, not a sing-box `.srs`)
    #[default]
    Binary,
    /// Human readable JSON source rule set (`.json`)
    Source,
}

impl OutputFormat {
    pub fn writer(&self) -> Box<dyn RuleSetWriter> {
        match self {
            OutputFormat::Binary => Box::new(BinaryWriter),
            OutputFormat::Source => Box::new(SourceWriter),
        }
    }

    pub fn extension(&self) -> &'static str {
        self.writer().extension()
    }
}

/// Encode `rule_set` into an in-memory buffer.
pub fn encode(
    rule_set: &PlainRuleSet,
    format: OutputFormat,
    version: u8,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    format.writer().write(&mut out, rule_set, version)?;
    Ok(out)
}

pub(crate) fn check_version(version: u8) -> Result<(), EncodeError> {
    if is_supported_version(version) {
        Ok(())
    } else {
        Err(EncodeError::UnsupportedVersion(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Binary.extension(), "crs");
        assert_eq!(OutputFormat::Source.extension(), "json");
    }
}
