//! Error types for the datascope library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for datascope operations.
#[derive(Debug, Error)]
pub enum DatascopeError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A stage was invoked before a dataset was loaded.
    #[error("No dataset loaded: {0}")]
    NotLoaded(String),

    /// Chart rendering failure.
    #[error("Chart error for '{chart}': {message}")]
    Chart { chart: String, message: String },

    /// Failure writing report artifacts.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for datascope operations.
pub type Result<T> = std::result::Result<T, DatascopeError>;
