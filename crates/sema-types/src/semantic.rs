//! Semantic conflicts and merge decisions.
//!
//! Semantic conflicts are produced by dependency analysis and merge rule
//! evaluation. They are data, not errors: advisory paths return them for the
//! validation service to weigh into a [`MergeDecision`].

use serde::{Deserialize, Serialize};

use crate::change::Severity;

/// Classification of a semantic conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictType {
    /// A dependency cycle was detected in the schema graph.
    CircularDependency,
    /// An entity has no inbound or outbound relations.
    OrphanedNode,
    /// A schema constraint would be violated by the change.
    ConstraintViolation,
    /// The two sides are mutually inconsistent.
    Inconsistency,
    /// The same entity was changed differently on both branches.
    MergeConflict,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CircularDependency => "circular_dependency",
            Self::OrphanedNode => "orphaned_node",
            Self::ConstraintViolation => "constraint_violation",
            Self::Inconsistency => "inconsistency",
            Self::MergeConflict => "merge_conflict",
        };
        write!(f, "{s}")
    }
}

/// A semantic-level conflict surfaced by analysis or rule evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SemanticConflict {
    pub conflict_type: ConflictType,
    /// Entity ids involved in the conflict.
    pub affected_nodes: Vec<String>,
    pub severity: Severity,
    pub description: String,
}

/// Automated disposition of a proposed merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeDecision {
    /// No blocking conflicts; the merge can proceed unattended.
    AutoMerge,
    /// A human must resolve at least one conflict first.
    ManualResolution,
    /// A critical conflict forbids the merge as proposed.
    RejectMerge,
    /// Too many conflicts to resolve in one pass; split the merge.
    DeferMerge,
}

impl std::fmt::Display for MergeDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AutoMerge => "auto_merge",
            Self::ManualResolution => "manual_resolution",
            Self::RejectMerge => "reject_merge",
            Self::DeferMerge => "defer_merge",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_type_display() {
        assert_eq!(
            ConflictType::CircularDependency.to_string(),
            "circular_dependency"
        );
        assert_eq!(ConflictType::MergeConflict.to_string(), "merge_conflict");
    }

    #[test]
    fn decision_display() {
        assert_eq!(MergeDecision::AutoMerge.to_string(), "auto_merge");
        assert_eq!(MergeDecision::DeferMerge.to_string(), "defer_merge");
    }

    #[test]
    fn semantic_conflict_roundtrip() {
        let conflict = SemanticConflict {
            conflict_type: ConflictType::OrphanedNode,
            affected_nodes: vec!["Widget".into()],
            severity: Severity::Low,
            description: "Widget has no relations".into(),
        };
        let json = serde_json::to_string(&conflict).unwrap();
        let back: SemanticConflict = serde_json::from_str(&json).unwrap();
        assert_eq!(conflict, back);
    }
}
