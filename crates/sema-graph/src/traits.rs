//! The [`GraphStore`] trait defining the store boundary.

use async_trait::async_trait;

use crate::context::QueryContext;
use crate::error::GraphResult;
use crate::query::GraphQuery;
use crate::value::Row;

/// External graph-oriented data store.
///
/// All implementations must satisfy these invariants:
/// - Rows are returned in a deterministic order for a given store state and
///   query: repeated execution yields identical row sequences.
/// - Binding columns follow the shared conventions: `"node"`, `"edge"`,
///   `"path"` for graph values; `"count"`, `"in_degree"`, `"out_degree"`
///   for scalars.
/// - The context is honored: implementations check
///   [`QueryContext::ensure_active`] and abort with `Cancelled`/`Timeout`
///   instead of returning partial rows.
/// - Failures are reported as errors, never as fabricated empty results.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute a typed query and return its ordered binding rows.
    async fn execute(&self, query: &GraphQuery, ctx: &QueryContext) -> GraphResult<Vec<Row>>;

    /// Cheap reachability probe, used to surface `RepositoryUnavailable`
    /// before a read path would otherwise fabricate data.
    async fn ping(&self, ctx: &QueryContext) -> GraphResult<()>;
}
