//! Error types for trajseg-core.

use thiserror::Error;

/// Result type alias for trajseg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for trajseg operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A histogram was requested over zero scores.
    #[error("cannot build a histogram from an empty score sequence")]
    EmptyInput,

    /// Input violated a precondition (non-positive total, negative score,
    /// mismatched trajectory life, invalid configuration).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Clustering error.
    #[error("clustering error: {0}")]
    Clustering(#[from] ClusteringError),
}

/// Errors raised by the adaptive clustering stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    /// Every cluster count up to the number of points left at least one
    /// member outside the radius bound.
    #[error("no partition of {points} points satisfies radius bound {max_radius}")]
    Unsatisfiable { max_radius: f64, points: usize },
}
