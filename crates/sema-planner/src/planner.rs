//! The query planner.
//!
//! `create_execution_plan` returns a cached plan while it is still valid
//! and rebuilds it otherwise. Validity, cost, TTL tier, and hints are pure
//! functions so the tables are testable in isolation; the planner itself
//! only wires them to the injected caches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use sema_types::{CoreConfig, Direction, TraversalQuery};

use crate::fingerprint::fingerprint;
use crate::plan::{PlanHint, QueryPlan};
use crate::stats::ExecutionStats;

/// Base cost unit every estimate scales from.
const BASE_COST: f64 = 10.0;

/// Cost above which a plan expires early (30 minutes).
const HIGH_COST: f64 = 100.0;
const HIGH_COST_MAX_AGE: Duration = Duration::from_secs(30 * 60);

/// Hint count above which a plan expires early (1 hour).
const MANY_HINTS: usize = 3;
const MANY_HINTS_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Depth at which traversals count as deep.
const DEEP_TRAVERSAL_DEPTH: u32 = 4;
/// Start-set size at which fan-out counts as wide.
const WIDE_START_SET: usize = 5;
/// Depth at which bidirectional expansion gets its own hint.
const BIDIRECTIONAL_DEEP_DEPTH: u32 = 3;

/// Per-identifier-filter cost reduction, capped at 70% total.
const IDENTIFIER_FILTER_REDUCTION: f64 = 0.35;
const MAX_FILTER_REDUCTION: f64 = 0.7;

/// Builds, caches, and invalidates cost-estimated execution plans.
///
/// The plan cache and the execution-stat table are plain maps behind
/// mutexes: every read-modify-write is serialized per table, so concurrent
/// `record_execution_stats` calls never lose updates to the running
/// averages.
pub struct QueryPlanner {
    config: CoreConfig,
    plans: Mutex<HashMap<String, QueryPlan>>,
    stats: Mutex<HashMap<String, ExecutionStats>>,
    computations: AtomicU64,
}

impl QueryPlanner {
    /// Create a planner with the supplied configuration.
    pub fn new(config: CoreConfig) -> Self {
        Self {
            config,
            plans: Mutex::new(HashMap::new()),
            stats: Mutex::new(HashMap::new()),
            computations: AtomicU64::new(0),
        }
    }

    /// Return the cached plan for this query if still valid, otherwise
    /// compute and cache a fresh one.
    pub fn create_execution_plan(&self, query: &TraversalQuery) -> QueryPlan {
        let fp = fingerprint(query);

        let mut plans = self.plans.lock().expect("plan cache poisoned");
        if let Some(plan) = plans.get(&fp) {
            if plan_is_valid(
                plan.age(),
                plan.estimated_cost,
                plan.hints.len(),
                self.config.thresholds.base_plan_max_age,
            ) {
                debug!(fingerprint = %&fp[..12], "plan cache hit");
                return plan.clone();
            }
        }

        let plan = self.compute_plan(fp.clone(), query);
        plans.insert(fp, plan.clone());
        plan
    }

    /// Drop the cached plan for a fingerprint.
    pub fn invalidate(&self, fingerprint: &str) {
        self.plans
            .lock()
            .expect("plan cache poisoned")
            .remove(fingerprint);
    }

    /// Drop every cached plan.
    pub fn clear(&self) {
        self.plans.lock().expect("plan cache poisoned").clear();
    }

    /// Fold one execution into the fingerprint's running averages.
    pub fn record_execution_stats(
        &self,
        fingerprint: &str,
        elapsed: Duration,
        result_count: usize,
        cache_hit: bool,
    ) {
        let mut stats = self.stats.lock().expect("stat table poisoned");
        stats
            .entry(fingerprint.to_string())
            .or_default()
            .record(elapsed, result_count, cache_hit);
    }

    /// Recorded statistics for a fingerprint, if any.
    pub fn stats(&self, fingerprint: &str) -> Option<ExecutionStats> {
        self.stats
            .lock()
            .expect("stat table poisoned")
            .get(fingerprint)
            .copied()
    }

    /// Number of plans computed (as opposed to served from cache).
    pub fn plan_computations(&self) -> u64 {
        self.computations.load(Ordering::SeqCst)
    }

    fn compute_plan(&self, fp: String, query: &TraversalQuery) -> QueryPlan {
        self.computations.fetch_add(1, Ordering::SeqCst);

        let normalized = normalize(query);
        let cost = self.estimate_cost(&normalized);
        let estimated_results = self.estimate_results(&fp, &normalized);
        let ttl = ttl_for_cost(cost, self.config.thresholds.base_cache_ttl);
        let hints = hints_for(&normalized);
        let cache_key = format!("trav:{}", &fp[..16]);
        debug!(fingerprint = %&fp[..12], cost, ?hints, "computed execution plan");

        QueryPlan {
            fingerprint: fp,
            query: normalized,
            estimated_cost: cost,
            estimated_results,
            cache_key,
            ttl,
            hints,
            created_at: Instant::now(),
        }
    }

    /// Cost model: base × depth^1.5 × (starts × 0.5) × (relations × 0.3)
    /// × direction factor × filter factor.
    fn estimate_cost(&self, query: &TraversalQuery) -> f64 {
        let depth_factor = f64::from(query.max_depth).powf(1.5);
        let start_factor = query.start_nodes.len() as f64 * 0.5;
        let relation_count = if query.relations.is_empty() {
            self.config.relation_identifiers.len().max(1)
        } else {
            query.relations.len()
        };
        let relation_factor = relation_count as f64 * 0.3;
        let direction_factor = if query.direction == Direction::Bidirectional {
            2.0
        } else {
            1.0
        };
        let filter_factor = self.filter_factor(query);

        BASE_COST * depth_factor * start_factor * relation_factor * direction_factor * filter_factor
    }

    /// Identifier-like filters make the query much cheaper for the store;
    /// each reduces cost 35%, capped at 70%.
    fn filter_factor(&self, query: &TraversalQuery) -> f64 {
        let identifier_filters = query
            .filters
            .keys()
            .filter(|k| self.config.is_identifier_filter(k))
            .count();
        let reduction =
            (identifier_filters as f64 * IDENTIFIER_FILTER_REDUCTION).min(MAX_FILTER_REDUCTION);
        1.0 - reduction
    }

    /// Historical per-fingerprint average when available, else a heuristic
    /// scaled by depth, start count, and filters.
    fn estimate_results(&self, fp: &str, query: &TraversalQuery) -> u64 {
        if let Some(stats) = self.stats(fp) {
            if stats.executions > 0 {
                return stats.avg_result_count.round().max(0.0) as u64;
            }
        }

        let base = 5u64
            .saturating_mul(u64::from(query.max_depth))
            .saturating_mul(query.start_nodes.len() as u64);
        (base / (1 + query.filters.len() as u64)).max(1)
    }
}

/// Normalized copy of a query: sorted, deduplicated lists.
fn normalize(query: &TraversalQuery) -> TraversalQuery {
    let mut normalized = query.clone();
    normalized.start_nodes.sort();
    normalized.start_nodes.dedup();
    normalized.relations.sort();
    normalized.relations.dedup();
    normalized
}

/// Plan validity: invalid once older than the base max age, OR expensive
/// (cost > 100) and older than 30 minutes, OR hint-heavy (> 3 hints) and
/// older than 1 hour.
pub fn plan_is_valid(age: Duration, cost: f64, hint_count: usize, base_max_age: Duration) -> bool {
    if age > base_max_age {
        return false;
    }
    if cost > HIGH_COST && age > HIGH_COST_MAX_AGE {
        return false;
    }
    if hint_count > MANY_HINTS && age > MANY_HINTS_MAX_AGE {
        return false;
    }
    true
}

/// Result-cache TTL tier: ×4 when cost > 10, ×2 when cost > 5, else ×1.
pub fn ttl_for_cost(cost: f64, base: Duration) -> Duration {
    if cost > 10.0 {
        base * 4
    } else if cost > 5.0 {
        base * 2
    } else {
        base
    }
}

/// Advisory hints derived from query shape.
pub fn hints_for(query: &TraversalQuery) -> Vec<PlanHint> {
    let mut hints = Vec::new();
    if query.max_depth >= DEEP_TRAVERSAL_DEPTH {
        hints.push(PlanHint::DeepTraversal);
    }
    if query.start_nodes.len() > WIDE_START_SET {
        hints.push(PlanHint::WideStartSet);
    }
    if query.filters.is_empty() {
        hints.push(PlanHint::FilterlessScan);
    }
    if query.direction == Direction::Bidirectional && query.max_depth >= BIDIRECTIONAL_DEEP_DEPTH {
        hints.push(PlanHint::BidirectionalDeep);
    }
    hints
}
