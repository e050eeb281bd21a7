//! The [`BranchRepository`] storage interface.

use async_trait::async_trait;

use sema_graph::QueryContext;
use sema_types::Branch;

use crate::error::BranchResult;

/// Branch persistence against the external store.
///
/// All implementations must satisfy these invariants:
/// - Branch names are the primary key; `put` replaces by name.
/// - `list` returns branches sorted by name.
/// - Reads fail with `Unavailable` when the backing store is unreachable —
///   they never fabricate data.
/// - The context is honored on every call.
#[async_trait]
pub trait BranchRepository: Send + Sync {
    /// Read a branch by name. `Ok(None)` when it does not exist.
    async fn get(&self, name: &str, ctx: &QueryContext) -> BranchResult<Option<Branch>>;

    /// Write a branch, replacing any branch with the same name.
    async fn put(&self, branch: &Branch, ctx: &QueryContext) -> BranchResult<()>;

    /// Delete a branch by name. Returns `true` if it existed.
    async fn remove(&self, name: &str, ctx: &QueryContext) -> BranchResult<bool>;

    /// All branches, sorted by name.
    async fn list(&self, ctx: &QueryContext) -> BranchResult<Vec<Branch>>;
}
