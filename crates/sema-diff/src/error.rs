//! Error types for the diff crate.

use sema_types::ErrorKind;

/// Errors that can occur during diff and merge operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A branch has no snapshot available.
    #[error("no snapshot for branch: {branch}")]
    SnapshotNotFound { branch: String },

    /// The snapshot source is unreachable.
    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}

impl DiffError {
    /// The closed taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SnapshotNotFound { .. } => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::RepositoryUnavailable,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Timeout => ErrorKind::Timeout,
        }
    }
}

impl From<sema_graph::GraphError> for DiffError {
    fn from(err: sema_graph::GraphError) -> Self {
        match err {
            sema_graph::GraphError::Cancelled => Self::Cancelled,
            sema_graph::GraphError::Timeout => Self::Timeout,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
