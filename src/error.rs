//! Error types for the landmark action library.
//!
//! Classification itself is infallible; these errors come from the outer
//! layers (configuration, smoother construction, frame stream I/O).

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame record or output serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown rule name or bad rule parameters
    #[error("Rule error: {0}")]
    RuleError(String),

    /// Smoother initialization error
    #[error("Smoothing error: {0}")]
    SmoothingError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
