use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator::OutputFormat;
use crate::interfaces::ConvertOptions;
use crate::models::is_supported_version;
use crate::parser::{MalformedRowPolicy, ParseOptions};
use crate::settings::settings::toml_settings::TomlSettings;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid delimiter {0:?}: expected a single ASCII character other than a quote or line break")]
    InvalidDelimiter(char),

    #[error("unsupported rule-set version: {0}")]
    UnsupportedVersion(u8),

    #[error("input extension must not be empty")]
    EmptyExtension,
}

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub input_extension: String,
    pub fail_fast: bool,

    pub delimiter: char,
    pub malformed_rows: MalformedRowPolicy,

    pub format: OutputFormat,
    pub version: u8,

    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(TomlSettings::default())
    }
}

impl From<TomlSettings> for Settings {
    fn from(toml: TomlSettings) -> Self {
        Settings {
            input_dir: toml.common.input_dir,
            output_dir: toml.common.output_dir,
            input_extension: toml.common.input_extension,
            fail_fast: toml.common.fail_fast,
            delimiter: toml.parser.delimiter,
            malformed_rows: toml.parser.malformed_rows,
            format: toml.output.format,
            version: toml.output.version,
            log_level: toml.advanced.log_level,
        }
    }
}

impl Settings {
    /// Parse settings from TOML content. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let toml: TomlSettings = toml::from_str(content)?;
        let settings = Settings::from(toml);
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.delimiter_byte()?;
        if !is_supported_version(self.version) {
            return Err(SettingsError::UnsupportedVersion(self.version));
        }
        if self.input_extension.trim_start_matches('.').is_empty() {
            return Err(SettingsError::EmptyExtension);
        }
        Ok(())
    }

    fn delimiter_byte(&self) -> Result<u8, SettingsError> {
        match self.delimiter {
            '"' | '\n' | '\r' => Err(SettingsError::InvalidDelimiter(self.delimiter)),
            c if c.is_ascii() => Ok(c as u8),
            c => Err(SettingsError::InvalidDelimiter(c)),
        }
    }

    /// Extension to match input files against, without a leading dot.
    pub fn input_extension(&self) -> &str {
        self.input_extension.trim_start_matches('.')
    }

    pub fn parse_options(&self) -> Result<ParseOptions, SettingsError> {
        Ok(ParseOptions {
            delimiter: self.delimiter_byte()?,
            malformed_rows: self.malformed_rows,
        })
    }

    pub fn convert_options(&self) -> Result<ConvertOptions, SettingsError> {
        if !is_supported_version(self.version) {
            return Err(SettingsError::UnsupportedVersion(self.version));
        }
        Ok(ConvertOptions {
            parse: self.parse_options()?,
            format: self.format,
            version: self.version,
        })
    }
}
