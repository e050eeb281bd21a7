//! Diff, conflict, and merge result types.
//!
//! A [`BranchDiff`] is the ordered change set between exactly two snapshots.
//! [`Conflict`]s are irreconcilable overlaps between two change sets on the
//! same entity. [`MergeResult`] records a strategy application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a single entity-level change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Renamed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
        };
        write!(f, "{s}")
    }
}

/// One entity-level change between two snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Entity classification, e.g. `"object_type"`.
    pub entity_type: String,
    /// The changed entity's id.
    pub entity_id: String,
    /// What happened to the entity.
    pub kind: ChangeKind,
    /// Content before the change. `None` for additions.
    pub old_value: Option<serde_json::Value>,
    /// Content after the change. `None` for removals.
    pub new_value: Option<serde_json::Value>,
    /// For modifications: the top-level fields that changed, sorted.
    pub changed_fields: Vec<String>,
    /// For renames: the id the entity previously had.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
}

impl DiffEntry {
    /// An entry with no field detail, for additions and removals.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        kind: ChangeKind,
        old_value: Option<serde_json::Value>,
        new_value: Option<serde_json::Value>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            kind,
            old_value,
            new_value,
            changed_fields: Vec::new(),
            renamed_from: None,
        }
    }
}

/// Conflict classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    /// The same entity was modified to different values on both sides.
    DivergentModification,
    /// One side modified an entity the other side removed.
    DeleteModify,
    /// Two entities were renamed onto the same id.
    RenameCollision,
}

/// Conflict and semantic-conflict severity, ordered from least to most
/// severe.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// An irreconcilable overlap between two change sets on the same entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub severity: Severity,
    /// Ids of the affected entities.
    pub entities: Vec<String>,
    pub description: String,
    /// Merge strategies that could resolve this conflict.
    pub suggested: Vec<MergeStrategy>,
}

/// Strategy for applying one branch's changes onto another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeStrategy {
    FastForward,
    ThreeWay,
    Squash,
    Rebase,
    /// Applies the source side unconditionally, conflicts included.
    Force,
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FastForward => "fast_forward",
            Self::ThreeWay => "three_way",
            Self::Squash => "squash",
            Self::Rebase => "rebase",
            Self::Force => "force",
        };
        write!(f, "{s}")
    }
}

/// The ordered change set between two snapshots.
///
/// Always computed between exactly two named snapshots at one instant —
/// never partial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BranchDiff {
    /// Branch the diff reads from (the "old" side).
    pub from: String,
    /// Branch the diff reads to (the "new" side).
    pub to: String,
    /// When the diff was computed.
    pub computed_at: DateTime<Utc>,
    /// Ordered change entries (sorted by entity id).
    pub entries: Vec<DiffEntry>,
    /// Conflicts detected against a common base, when conflict detection ran.
    pub conflicts: Vec<Conflict>,
}

impl BranchDiff {
    /// Returns `true` if any conflict was recorded on this diff.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Returns `true` if the diff holds no changes and no conflicts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.conflicts.is_empty()
    }

    /// Number of change entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries of a given kind.
    pub fn entries_of(&self, kind: ChangeKind) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }
}

/// One change applied during a merge, in replay order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedChange {
    /// Position in the replay log, starting at 0.
    pub seq: u32,
    pub entity_type: String,
    pub entity_id: String,
    pub kind: ChangeKind,
    /// The value written, `None` for removals.
    pub value: Option<serde_json::Value>,
}

/// Outcome of applying a merge strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub success: bool,
    pub merged_at: DateTime<Utc>,
    /// Conflicts that blocked the merge. Empty on success.
    pub conflicts: Vec<Conflict>,
    /// Ordered replay log of the changes that were applied.
    pub applied: Vec<AppliedChange>,
    /// Identifier for this merge attempt.
    pub merge_id: Uuid,
}
