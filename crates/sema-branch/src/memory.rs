//! In-memory branch repository for testing and ephemeral use.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use sema_graph::QueryContext;
use sema_types::Branch;

use crate::error::{BranchError, BranchResult};
use crate::traits::BranchRepository;

/// An in-memory implementation of [`BranchRepository`].
///
/// All data lives in a `HashMap` behind a `RwLock`. Data is lost when the
/// store is dropped. The [`set_unavailable`](Self::set_unavailable) hook
/// simulates an unreachable backing store.
#[derive(Debug, Default)]
pub struct InMemoryBranchRepository {
    branches: RwLock<HashMap<String, Branch>>,
    unavailable: AtomicBool,
}

impl InMemoryBranchRepository {
    /// Create a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: make every call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> BranchResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BranchError::Unavailable("repository offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BranchRepository for InMemoryBranchRepository {
    async fn get(&self, name: &str, ctx: &QueryContext) -> BranchResult<Option<Branch>> {
        ctx.ensure_active()?;
        self.check_available()?;
        let branches = self.branches.read().expect("branch table poisoned");
        Ok(branches.get(name).cloned())
    }

    async fn put(&self, branch: &Branch, ctx: &QueryContext) -> BranchResult<()> {
        ctx.ensure_active()?;
        self.check_available()?;
        let mut branches = self.branches.write().expect("branch table poisoned");
        branches.insert(branch.name.clone(), branch.clone());
        Ok(())
    }

    async fn remove(&self, name: &str, ctx: &QueryContext) -> BranchResult<bool> {
        ctx.ensure_active()?;
        self.check_available()?;
        let mut branches = self.branches.write().expect("branch table poisoned");
        Ok(branches.remove(name).is_some())
    }

    async fn list(&self, ctx: &QueryContext) -> BranchResult<Vec<Branch>> {
        ctx.ensure_active()?;
        self.check_available()?;
        let branches = self.branches.read().expect("branch table poisoned");
        let mut result: Vec<Branch> = branches.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }
}
