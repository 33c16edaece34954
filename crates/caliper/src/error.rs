//! Error types for the Caliper library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Caliper operations.
///
/// Per-column problems (unparseable values, malformed rule patterns,
/// zero-variance columns) are never reported through this type; they degrade
/// the affected column in the report instead.
#[derive(Debug, Error)]
pub enum CaliperError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Two columns share a name.
    #[error("Duplicate column name: '{0}'")]
    DuplicateColumn(String),

    /// A row does not have one cell per column.
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A column referenced by one pipeline input is missing from another.
    ///
    /// This is a caller bug and aborts report assembly.
    #[error("Contract violation: column '{column}' is missing from {input}")]
    ContractViolation { column: String, input: String },
}

/// Result type alias for Caliper operations.
pub type Result<T> = std::result::Result<T, CaliperError>;
