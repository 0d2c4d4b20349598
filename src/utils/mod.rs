pub mod file;

// Re-export common utilities
pub use file::{discover_inputs, output_path_for, write_atomically};
