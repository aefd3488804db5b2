//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Corpus loading error
    #[error("Ingestion error: {0}")]
    Ingest(#[from] ownergraph_ingest::IngestError),

    /// Query error
    #[error("{0}")]
    Query(#[from] ownergraph_domain::QueryError),

    /// Ownership cycle, described with entity names
    #[error("Ownership cycle detected: {0}")]
    Cycle(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line editor error
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
