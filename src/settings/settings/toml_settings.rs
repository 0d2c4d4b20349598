use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::generator::OutputFormat;
use crate::models::RULE_SET_VERSION_CURRENT;
use crate::parser::MalformedRowPolicy;

fn default_input_dir() -> PathBuf {
    PathBuf::from("./csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./srs")
}

fn default_input_extension() -> String {
    "csv".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_version() -> u8 {
    RULE_SET_VERSION_CURRENT
}

fn default_info_log_level() -> String {
    "info".to_string()
}

/// Common settings section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommonSettings {
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for CommonSettings {
    fn default() -> Self {
        CommonSettings {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            input_extension: default_input_extension(),
            fail_fast: false,
        }
    }
}

/// How input rows are read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserSettings {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub malformed_rows: MalformedRowPolicy,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            delimiter: default_delimiter(),
            malformed_rows: MalformedRowPolicy::default(),
        }
    }
}

/// What gets written for each input
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_version")]
    pub version: u8,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: OutputFormat::default(),
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvancedSettings {
    #[serde(default = "default_info_log_level")]
    pub log_level: String,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        AdvancedSettings {
            log_level: default_info_log_level(),
        }
    }
}

/// Layout of the TOML configuration file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TomlSettings {
    pub common: CommonSettings,
    pub parser: ParserSettings,
    pub output: OutputSettings,
    pub advanced: AdvancedSettings,
}
