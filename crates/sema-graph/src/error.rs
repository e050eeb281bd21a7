//! Error types for graph-store operations.

use sema_types::ErrorKind;

/// Errors that can occur when executing a query against the backing store.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The store is unreachable or returned a malformed response. The
    /// message describes the failure without echoing store query text.
    #[error("graph store unavailable: {0}")]
    Unavailable(String),

    /// The query was structurally invalid for the store.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller-supplied deadline elapsed.
    #[error("operation timed out")]
    Timeout,
}

impl GraphError {
    /// The closed taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) => ErrorKind::RepositoryUnavailable,
            Self::InvalidQuery(_) => ErrorKind::ValidationFailed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Timeout => ErrorKind::Timeout,
        }
    }
}

/// Convenience alias for graph-store results.
pub type GraphResult<T> = Result<T, GraphError>;
