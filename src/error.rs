//! Error types for the task suggestion service
//!
//! Distinguishes transient match failures (recovered by the retry executor)
//! from terminal retry exhaustion (surfaced to the HTTP boundary as a 500).

use thiserror::Error;

/// Main error type for task suggestion operations
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A single match attempt failed. Recoverable: the retry executor absorbs
    /// these until attempts run out.
    #[error("Transient match failure: {message}")]
    TransientMatchFailure { message: String },

    /// All retry attempts were consumed without a successful match attempt.
    /// Not recovered internally; the caller must surface it.
    #[error("Operation failed after {attempts} attempts")]
    OperationExhausted { attempts: u32 },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl SuggestError {
    /// Create a transient match failure
    pub fn transient<S: Into<String>>(message: S) -> Self {
        Self::TransientMatchFailure {
            message: message.into(),
        }
    }

    /// Create an exhaustion error carrying the attempt count
    pub fn exhausted(attempts: u32) -> Self {
        Self::OperationExhausted { attempts }
    }

    /// Create an internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Whether this error is worth another attempt
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientMatchFailure { .. })
    }
}

/// Result type for suggestion operations
pub type SuggestResult<T> = Result<T, SuggestError>;
