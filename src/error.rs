use std::path::PathBuf;

use thiserror::Error;

use crate::generator::EncodeError;

/// Errors that fail the conversion of a single input file.
///
/// None of these affect other files of a batch.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("line {line}: expected 2 columns, found {columns}")]
    MalformedRow { line: u64, columns: usize },

    #[error("line {line}: unknown rule type: {token}")]
    UnknownCategory { line: u64, token: String },

    #[error("failed to read record: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("output {} is already produced by another input", path.display())]
    OutputCollision { path: PathBuf },

    #[error("output {} would overwrite its own input", path.display())]
    OutputIsInput { path: PathBuf },

    #[error("failed to write rule set: {0}")]
    Encode(#[from] EncodeError),
}

impl ConvertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }
}
