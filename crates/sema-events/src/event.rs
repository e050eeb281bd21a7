//! Event payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of change events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A branch was created.
    BranchCreated,
    /// A branch was deleted.
    BranchDeleted,
    /// A merge was applied to a target branch.
    MergeCompleted,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BranchCreated => "BranchCreated",
            Self::BranchDeleted => "BranchDeleted",
            Self::MergeCompleted => "MergeCompleted",
        };
        write!(f, "{s}")
    }
}

/// A single change event emitted by the core.
///
/// The payload shape is part of the boundary contract: consumers receive
/// `{type, branch_name, parent|source|target, actor, timestamp}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// The branch the event pertains to. For merges this is the target.
    pub branch_name: String,
    /// Parent branch for creations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Source branch for merges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Actor that triggered the change.
    pub actor: String,
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    /// Event for a branch creation.
    pub fn branch_created(name: impl Into<String>, parent: Option<String>, actor: impl Into<String>) -> Self {
        Self {
            kind: EventKind::BranchCreated,
            branch_name: name.into(),
            parent,
            source: None,
            actor: actor.into(),
            timestamp: Utc::now(),
        }
    }

    /// Event for a branch deletion.
    pub fn branch_deleted(name: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            kind: EventKind::BranchDeleted,
            branch_name: name.into(),
            parent: None,
            source: None,
            actor: actor.into(),
            timestamp: Utc::now(),
        }
    }

    /// Event for a completed merge of `source` into `target`.
    pub fn merge_completed(
        source: impl Into<String>,
        target: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            kind: EventKind::MergeCompleted,
            branch_name: target.into(),
            parent: None,
            source: Some(source.into()),
            actor: actor.into(),
            timestamp: Utc::now(),
        }
    }
}
