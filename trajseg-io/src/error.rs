//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Memory mapping error.
    #[error("memory mapping error: {0}")]
    MmapError(String),

    /// Malformed trajectory record.
    #[error("invalid file format at line {line}: {reason}")]
    InvalidFormat { line: usize, reason: String },

    /// A well-formed record whose values violate a core invariant.
    #[error("invalid record at line {line}: {source}")]
    InvalidRecord {
        line: usize,
        #[source]
        source: trajseg_core::Error,
    },

    /// Report serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] trajseg_core::Error),
}
