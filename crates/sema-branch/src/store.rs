//! The [`BranchStore`] service.
//!
//! Enforces the repository rules on top of a [`BranchRepository`]: unique
//! names, parent existence, default-branch protection, and explicit
//! initialization. Emits [`ChangeEvent`]s to the configured publisher;
//! publish failures are logged, never propagated.

use std::sync::Arc;

use tracing::{debug, warn};

use sema_events::{ChangeEvent, EventPublisher, NoopPublisher};
use sema_graph::QueryContext;
use sema_types::{Branch, CoreConfig};

use crate::error::{BranchError, BranchResult};
use crate::names::validate_branch_name;
use crate::traits::BranchRepository;

/// Branch existence, creation, deletion, and lookup.
pub struct BranchStore {
    repository: Arc<dyn BranchRepository>,
    publisher: Arc<dyn EventPublisher>,
    config: CoreConfig,
}

impl BranchStore {
    /// Create a store with no event publisher configured.
    pub fn new(repository: Arc<dyn BranchRepository>, config: CoreConfig) -> Self {
        Self {
            repository,
            publisher: Arc::new(NoopPublisher),
            config,
        }
    }

    /// Create a store that emits events to `publisher`.
    pub fn with_publisher(
        repository: Arc<dyn BranchRepository>,
        publisher: Arc<dyn EventPublisher>,
        config: CoreConfig,
    ) -> Self {
        Self {
            repository,
            publisher,
            config,
        }
    }

    /// Create a branch from an existing parent.
    ///
    /// Fails with `AlreadyExists` when the name is taken and `NotFound` when
    /// the parent is missing. Creating the configured default branch marks
    /// it protected.
    pub async fn create(
        &self,
        name: &str,
        from: Option<&str>,
        by: &str,
        ctx: &QueryContext,
    ) -> BranchResult<Branch> {
        validate_branch_name(name)?;

        if let Some(parent) = from {
            if self.repository.get(parent, ctx).await?.is_none() {
                return Err(BranchError::NotFound {
                    name: parent.to_string(),
                });
            }
        }

        if self.repository.get(name, ctx).await?.is_some() {
            return Err(BranchError::AlreadyExists {
                name: name.to_string(),
            });
        }

        let mut branch = Branch::new(name, from.map(String::from), by);
        if name == self.config.default_branch {
            branch = branch.into_default();
        }
        self.repository.put(&branch, ctx).await?;
        debug!(branch = %branch.name, parent = ?branch.parent, "created branch");

        self.emit(ChangeEvent::branch_created(
            name,
            from.map(String::from),
            by,
        ))
        .await;
        Ok(branch)
    }

    /// Idempotent form of [`create`](Self::create): an existing branch with
    /// the same name is success-equivalent, for safe retries.
    pub async fn create_or_get(
        &self,
        name: &str,
        from: Option<&str>,
        by: &str,
        ctx: &QueryContext,
    ) -> BranchResult<Branch> {
        match self.create(name, from, by, ctx).await {
            Err(BranchError::AlreadyExists { .. }) => {
                let existing = self.repository.get(name, ctx).await?;
                existing.ok_or_else(|| BranchError::NotFound {
                    name: name.to_string(),
                })
            }
            other => other,
        }
    }

    /// Delete a branch.
    ///
    /// The default branch and protected branches fail with `Protected`;
    /// missing branches fail with `NotFound`.
    pub async fn delete(&self, name: &str, by: &str, ctx: &QueryContext) -> BranchResult<()> {
        let branch = self
            .repository
            .get(name, ctx)
            .await?
            .ok_or_else(|| BranchError::NotFound {
                name: name.to_string(),
            })?;

        if !branch.is_deletable() {
            return Err(BranchError::Protected {
                name: name.to_string(),
            });
        }

        self.repository.remove(name, ctx).await?;
        debug!(branch = %name, "deleted branch");
        self.emit(ChangeEvent::branch_deleted(name, by)).await;
        Ok(())
    }

    /// Look up a branch by name.
    pub async fn get(&self, name: &str, ctx: &QueryContext) -> BranchResult<Branch> {
        self.repository
            .get(name, ctx)
            .await?
            .ok_or_else(|| BranchError::NotFound {
                name: name.to_string(),
            })
    }

    /// Returns `true` if the branch exists.
    pub async fn exists(&self, name: &str, ctx: &QueryContext) -> BranchResult<bool> {
        Ok(self.repository.get(name, ctx).await?.is_some())
    }

    /// All branches, sorted by name.
    pub async fn list(&self, ctx: &QueryContext) -> BranchResult<Vec<Branch>> {
        self.repository.list(ctx).await
    }

    /// Explicit repository bootstrap: create the protected default branch
    /// if it does not exist yet.
    ///
    /// Reads never fabricate a default branch; a repository that was never
    /// initialized reports `NotFound` until this is called.
    pub async fn initialize_repository(&self, by: &str, ctx: &QueryContext) -> BranchResult<Branch> {
        let default_branch = self.config.default_branch.clone();
        self.create_or_get(&default_branch, None, by, ctx).await
    }

    async fn emit(&self, event: ChangeEvent) {
        if let Err(err) = self.publisher.publish(&event).await {
            warn!(kind = %event.kind, branch = %event.branch_name, %err, "event publish failed");
        }
    }
}
