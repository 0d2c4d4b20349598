// Re-export types and implementations
pub mod settings_struct;
pub mod toml_settings;

pub use settings_struct::{Settings, SettingsError};
pub use toml_settings::TomlSettings;
