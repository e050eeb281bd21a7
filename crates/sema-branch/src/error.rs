//! Error types for branch operations.

use sema_types::ErrorKind;

/// Errors produced by branch operations.
#[derive(Debug, thiserror::Error)]
pub enum BranchError {
    #[error("branch not found: {name}")]
    NotFound { name: String },

    #[error("branch already exists: {name}")]
    AlreadyExists { name: String },

    #[error("branch is protected: {name}")]
    Protected { name: String },

    #[error("invalid branch name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The backing repository is unreachable. Reads surface this instead of
    /// fabricating data.
    #[error("branch repository unavailable: {0}")]
    Unavailable(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}

impl BranchError {
    /// The closed taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Protected { .. } => ErrorKind::Protected,
            Self::InvalidName { .. } => ErrorKind::ValidationFailed,
            Self::Unavailable(_) => ErrorKind::RepositoryUnavailable,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Timeout => ErrorKind::Timeout,
        }
    }
}

impl From<sema_graph::GraphError> for BranchError {
    fn from(err: sema_graph::GraphError) -> Self {
        match err {
            sema_graph::GraphError::Cancelled => Self::Cancelled,
            sema_graph::GraphError::Timeout => Self::Timeout,
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Convenience alias for branch results.
pub type BranchResult<T> = Result<T, BranchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_taxonomy() {
        assert_eq!(
            BranchError::NotFound { name: "x".into() }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            BranchError::Protected { name: "main".into() }.kind(),
            ErrorKind::Protected
        );
        assert_eq!(
            BranchError::Unavailable("down".into()).kind(),
            ErrorKind::RepositoryUnavailable
        );
    }

    #[test]
    fn graph_errors_convert() {
        let err: BranchError = sema_graph::GraphError::Cancelled.into();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        let err: BranchError = sema_graph::GraphError::Unavailable("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::RepositoryUnavailable);
    }
}
