//! Externally supplied configuration.
//!
//! The core does not own configuration: the embedding platform supplies a
//! [`CoreConfig`] at construction time. Components take it by value or
//! `Arc`; there is no module-level state.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunable thresholds consumed across the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// In+out degree at which a node counts as a hub.
    pub high_degree: usize,
    /// Combined direct + transitive dependent count above which a change is
    /// flagged high-impact.
    pub high_impact_changes: usize,
    /// Hop budget within which a hub-to-hub path is marked critical.
    pub critical_path_hops: usize,
    /// Minimum resolution confidence for automatic merging.
    pub auto_resolve_confidence: f64,
    /// Conflict count above which a merge is deferred instead of resolved
    /// manually.
    pub max_merge_conflicts: usize,
    /// Base TTL for traversal result cache entries.
    pub base_cache_ttl: Duration,
    /// Base maximum age for cached query plans.
    pub base_plan_max_age: Duration,
    /// Cap on in-flight sub-queries against the backing store.
    pub max_concurrency: usize,
    /// Upper bound accepted for `TraversalQuery::max_depth`.
    pub max_traversal_depth: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_degree: 5,
            high_impact_changes: 10,
            critical_path_hops: 3,
            auto_resolve_confidence: 0.8,
            max_merge_conflicts: 20,
            base_cache_ttl: Duration::from_secs(300),
            base_plan_max_age: Duration::from_secs(2 * 60 * 60),
            max_concurrency: 10,
            max_traversal_depth: 10,
        }
    }
}

/// Externally supplied configuration for the versioning-and-query core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Relation type → identifier used by the backing store.
    pub relation_identifiers: BTreeMap<String, String>,
    /// Schema entity type → identifier used by the backing store.
    pub schema_identifiers: BTreeMap<String, String>,
    /// Relation type → estimated selectivity in `(0, 1]`. Lower is more
    /// selective; alternations are ordered most-selective first.
    pub relation_selectivity: BTreeMap<String, f64>,
    /// Name of the repository's default branch.
    pub default_branch: String,
    /// Namespace prefix of system-owned entities, excluded from orphan
    /// analysis.
    pub system_namespace: String,
    pub thresholds: Thresholds,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            relation_identifiers: BTreeMap::new(),
            schema_identifiers: BTreeMap::new(),
            relation_selectivity: BTreeMap::new(),
            default_branch: "main".into(),
            system_namespace: "system".into(),
            thresholds: Thresholds::default(),
        }
    }
}

impl CoreConfig {
    /// All configured relation types, most selective first.
    ///
    /// Relations without a selectivity entry sort last, alphabetically, so
    /// the ordering stays deterministic.
    pub fn relations_by_selectivity(&self) -> Vec<String> {
        let mut relations: Vec<&String> = self.relation_identifiers.keys().collect();
        relations.sort_by(|a, b| {
            let sa = self.relation_selectivity.get(*a).copied().unwrap_or(1.0);
            let sb = self.relation_selectivity.get(*b).copied().unwrap_or(1.0);
            sa.partial_cmp(&sb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        relations.into_iter().cloned().collect()
    }

    /// Returns `true` when a filter key selects on an identifier, which
    /// makes the query much cheaper for the store to answer.
    pub fn is_identifier_filter(&self, key: &str) -> bool {
        key == "id"
            || key.ends_with("_id")
            || self.schema_identifiers.values().any(|v| v == key)
    }

    /// Returns `true` when an entity id belongs to the system namespace.
    pub fn is_system_entity(&self, entity_id: &str) -> bool {
        entity_id.starts_with(&self.system_namespace)
    }
}
