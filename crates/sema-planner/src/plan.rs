//! Execution plans and optimization hints.

use std::time::{Duration, Instant};

use sema_types::TraversalQuery;

/// Advisory flags attached to a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanHint {
    /// Depth at or beyond the deep-traversal threshold.
    DeepTraversal,
    /// Start set wider than the fan-out threshold.
    WideStartSet,
    /// No property filters; the store will scan relation-wide.
    FilterlessScan,
    /// Bidirectional expansion combined with a deep traversal.
    BidirectionalDeep,
}

impl std::fmt::Display for PlanHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::DeepTraversal => "deep_traversal",
            Self::WideStartSet => "wide_start_set",
            Self::FilterlessScan => "filterless_scan",
            Self::BidirectionalDeep => "bidirectional_deep",
        };
        write!(f, "{s}")
    }
}

/// A cached, cost-estimated representation of how to execute a traversal.
#[derive(Clone, Debug)]
pub struct QueryPlan {
    /// Stable hash of the canonicalized query.
    pub fingerprint: String,
    /// The canonicalized query this plan executes.
    pub query: TraversalQuery,
    /// Estimated execution cost in abstract units.
    pub estimated_cost: f64,
    /// Estimated result row count.
    pub estimated_results: u64,
    /// Key under which results of this plan should be cached.
    pub cache_key: String,
    /// Recommended result-cache TTL, scaled by cost tier.
    pub ttl: Duration,
    /// Advisory optimization hints.
    pub hints: Vec<PlanHint>,
    /// When the plan was created.
    pub created_at: Instant,
}

impl QueryPlan {
    /// Age of the plan.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
