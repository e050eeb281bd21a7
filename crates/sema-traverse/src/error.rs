//! Error types for the traversal engine.

use sema_types::ErrorKind;

/// Errors that can occur during traversal.
#[derive(Debug, thiserror::Error)]
pub enum TraverseError {
    /// The query failed bounds validation before reaching the store.
    #[error("invalid traversal query: {reason}")]
    InvalidQuery { reason: String },

    /// The store rejected or failed the query.
    #[error("store error: {0}")]
    Store(#[from] sema_graph::GraphError),
}

impl TraverseError {
    /// The closed taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidQuery { .. } => ErrorKind::ValidationFailed,
            Self::Store(inner) => inner.kind(),
        }
    }
}

/// Convenience alias for traversal results.
pub type TraverseResult<T> = Result<T, TraverseError>;
