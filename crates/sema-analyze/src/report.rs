//! Impact analysis report types.

use serde::{Deserialize, Serialize};

/// The kind of change being analyzed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeType {
    Addition,
    Modification,
    Deletion,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Addition => "addition",
            Self::Modification => "modification",
            Self::Deletion => "deletion",
        };
        write!(f, "{s}")
    }
}

/// What a change to one entity affects downstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// The entity being changed.
    pub entity: String,
    /// Entities with a direct dependency on the entity, sorted.
    pub direct_dependents: Vec<String>,
    /// Entities reaching the entity through intermediaries, sorted;
    /// disjoint from the direct set.
    pub transitive_dependents: Vec<String>,
    /// Direct dependents flagged critical, sorted.
    pub critical_services: Vec<String>,
    /// Human-readable rollout guidance.
    pub recommendations: Vec<String>,
}

impl ImpactReport {
    /// Combined count of direct and transitive dependents.
    pub fn affected_count(&self) -> usize {
        self.direct_dependents.len() + self.transitive_dependents.len()
    }
}
