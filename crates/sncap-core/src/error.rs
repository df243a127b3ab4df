//! Error types for sncap core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.
//!
//! Lossy decoding and short rows are not errors: they are counted in
//! [`crate::LoadStats`] and the file is still validated.

use thiserror::Error;

/// Result type alias for sncap operations.
pub type Result<T> = std::result::Result<T, SncapError>;

/// Core error type for sncap operations.
#[derive(Debug, Error)]
pub enum SncapError {
    /// Archive holds no `.csv`/`.txt` entry
    #[error("No data file found in archive {0}")]
    NoDataFound(String),

    /// Archive could not be opened or read
    #[error("Archive error: {0}")]
    Archive(String),

    /// Delimited text could not be parsed or written
    #[error("CSV error: {0}")]
    Csv(String),

    /// I/O failure while reading input or writing output
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for SncapError {
    fn from(err: std::io::Error) -> Self {
        SncapError::Io(err.to_string())
    }
}

impl From<csv::Error> for SncapError {
    fn from(err: csv::Error) -> Self {
        SncapError::Csv(err.to_string())
    }
}

impl From<zip::result::ZipError> for SncapError {
    fn from(err: zip::result::ZipError) -> Self {
        SncapError::Archive(err.to_string())
    }
}
