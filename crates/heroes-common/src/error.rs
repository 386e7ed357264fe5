//! Error types for the heroes-etl pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, EtlError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Load rejected {failed} of {total} documents for non-duplicate reasons: {detail}")]
    LoadFailed {
        failed: usize,
        total: usize,
        detail: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}
