//! Settings module for csv2srs
//!
//! Settings come from an optional TOML file; command line flags are
//! applied on top by the binary.

pub mod settings;

// Re-export settings struct and errors
pub use settings::settings_struct::{Settings, SettingsError};
