//! Snapshot loading.
//!
//! A [`SnapshotSource`] materializes a branch's full entity set at one
//! instant. Diffs are only ever computed between two complete snapshots —
//! never against a partially loaded branch.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use sema_graph::QueryContext;
use sema_types::BranchSnapshot;

use crate::error::{DiffError, DiffResult};

/// Loads branch snapshots from the backing store.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load the full snapshot of `branch`.
    ///
    /// Fails with `SnapshotNotFound` for unknown branches and `Unavailable`
    /// when the backing store is unreachable — it never returns a partial
    /// entity set.
    async fn load_snapshot(&self, branch: &str, ctx: &QueryContext) -> DiffResult<BranchSnapshot>;
}

/// An in-memory implementation of [`SnapshotSource`] for tests.
#[derive(Debug, Default)]
pub struct InMemorySnapshotSource {
    snapshots: RwLock<HashMap<String, BranchSnapshot>>,
}

impl InMemorySnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a snapshot under its branch name.
    pub fn insert(&self, snapshot: BranchSnapshot) {
        self.snapshots
            .write()
            .expect("snapshot table poisoned")
            .insert(snapshot.branch.clone(), snapshot);
    }
}

#[async_trait]
impl SnapshotSource for InMemorySnapshotSource {
    async fn load_snapshot(&self, branch: &str, ctx: &QueryContext) -> DiffResult<BranchSnapshot> {
        ctx.ensure_active()?;
        let snapshots = self.snapshots.read().expect("snapshot table poisoned");
        snapshots
            .get(branch)
            .cloned()
            .ok_or_else(|| DiffError::SnapshotNotFound {
                branch: branch.to_string(),
            })
    }
}
