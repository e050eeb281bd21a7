//! The closed error taxonomy shared by all core operations.
//!
//! Every public error type in the Sema workspace maps into [`ErrorKind`] via
//! a `kind()` accessor. Transports translate kinds to wire codes at the
//! boundary; the core never branches on concrete error types across crate
//! seams.

use serde::{Deserialize, Serialize};

/// Stable classification of every error a core operation can return.
///
/// User-visible errors carry a kind and a message only — never raw store
/// query text or file paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A named resource (branch, entity, snapshot) does not exist.
    NotFound,
    /// A resource with the same name already exists.
    AlreadyExists,
    /// The operation targets a protected resource (e.g. the default branch).
    Protected,
    /// Overlapping changes that cannot be reconciled. Non-fatal: conflicts
    /// are usually returned as data, this kind covers fail-closed paths.
    Conflict,
    /// A required validation step failed. Fatal for merge decisions.
    ValidationFailed,
    /// The backing store is unreachable or returned a malformed response.
    RepositoryUnavailable,
    /// The caller cancelled the operation; partial work was discarded.
    Cancelled,
    /// The caller-supplied deadline elapsed; partial work was discarded.
    Timeout,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Protected => "protected",
            Self::Conflict => "conflict",
            Self::ValidationFailed => "validation_failed",
            Self::RepositoryUnavailable => "repository_unavailable",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
        };
        write!(f, "{s}")
    }
}

impl ErrorKind {
    /// Returns `true` for kinds that are safe to retry without side effects.
    ///
    /// Branch creation treats `AlreadyExists` as success-equivalent on
    /// retry; transient store and deadline failures are retryable as well.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyExists | Self::RepositoryUnavailable | Self::Timeout
        )
    }

    /// Returns `true` for kinds that must abort the surrounding operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ValidationFailed)
    }
}
