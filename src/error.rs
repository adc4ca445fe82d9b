//! Typewell Error Types
//!
//! Centralized error handling for the library; the binary wraps these in
//! `anyhow` at its edges.

use thiserror::Error;

/// Central error type for Typewell
#[derive(Error, Debug)]
pub enum TypewellError {
    #[error("Cannot access page: {0}")]
    InjectionDenied(String),

    #[error("Unknown tone: {0}")]
    UnknownTone(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Typewell operations
pub type TypewellResult<T> = Result<T, TypewellError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for TypewellError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TypewellError::Lock(err.to_string())
    }
}
