//! Error types for ingestion

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading corpus files
#[derive(Error, Debug)]
pub enum IngestError {
    /// File could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: csv::Error,
    },

    /// File has no header row
    #[error("Missing header row in {}", .path.display())]
    MissingHeader {
        /// File path, or `<reader>` for in-memory input
        path: PathBuf,
    },

    /// Malformed delimited data
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
