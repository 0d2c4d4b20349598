pub mod error;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;

// Re-export the main rule-set types for easier access
pub use models::{PlainRuleSet, RuleCategory, RuleSet};

// Re-export the conversion entry points
pub use error::ConvertError;
pub use interfaces::{convert_dir, convert_file, ConvertOptions};
pub use settings::Settings;
