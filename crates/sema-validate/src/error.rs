//! Error types for merge validation.
//!
//! Validation is fail-closed: any unexpected failure from a required step
//! aborts the whole call. A partial validation never produces a decision.

use sema_types::ErrorKind;

/// Errors produced by merge validation.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// A required validation step failed.
    #[error("merge validation failed: {0}")]
    ValidationFailed(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}

impl ValidateError {
    /// The closed taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Timeout => ErrorKind::Timeout,
        }
    }
}

impl From<sema_diff::DiffError> for ValidateError {
    fn from(err: sema_diff::DiffError) -> Self {
        match err.kind() {
            ErrorKind::Cancelled => Self::Cancelled,
            ErrorKind::Timeout => Self::Timeout,
            _ => Self::ValidationFailed(err.to_string()),
        }
    }
}

impl From<sema_traverse::TraverseError> for ValidateError {
    fn from(err: sema_traverse::TraverseError) -> Self {
        match err.kind() {
            ErrorKind::Cancelled => Self::Cancelled,
            ErrorKind::Timeout => Self::Timeout,
            _ => Self::ValidationFailed(err.to_string()),
        }
    }
}

/// Convenience alias for validation results.
pub type ValidateResult<T> = Result<T, ValidateError>;
