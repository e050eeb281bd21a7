//! Branch metadata.
//!
//! A branch is a named pointer to a versioned schema-graph snapshot. The
//! parent reference is weak (by name): deleting a parent does not cascade to
//! its children.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named pointer to a versioned schema-graph snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique branch identifier.
    pub id: Uuid,
    /// Human-readable branch name (unique within the repository).
    pub name: String,
    /// Name of the branch this one was created from, if any. Weak reference:
    /// the parent may have been deleted since.
    pub parent: Option<String>,
    /// When the branch was created.
    pub created_at: DateTime<Utc>,
    /// Actor that created the branch.
    pub created_by: String,
    /// Protected branches cannot be deleted.
    pub protected: bool,
    /// Whether this is the repository's default branch. The default branch
    /// is never deletable.
    pub is_default: bool,
    /// Free-form branch metadata.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Branch {
    /// Create a new branch record with a fresh id and the current time.
    pub fn new(name: impl Into<String>, parent: Option<String>, created_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            parent,
            created_at: Utc::now(),
            created_by: created_by.into(),
            protected: false,
            is_default: false,
            metadata: BTreeMap::new(),
        }
    }

    /// Mark this branch as the protected default branch.
    pub fn into_default(mut self) -> Self {
        self.is_default = true;
        self.protected = true;
        self
    }

    /// Returns `true` if the branch may be deleted.
    pub fn is_deletable(&self) -> bool {
        !self.is_default && !self.protected
    }
}
