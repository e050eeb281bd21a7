//! The traversal engine.
//!
//! One public call is one logical unit: `traverse` builds a single union or
//! path query, `find_dependency_paths` fans out one sub-query per configured
//! relation over a bounded worker pool. Sub-results are joined by iterating
//! the inputs in stable order and zipping with outputs — never by arrival
//! order — so deduplication and path ordering are reproducible across runs.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, warn};
use uuid::Uuid;

use sema_graph::{
    GraphError, GraphQuery, GraphStore, HopPattern, PathPattern, PathsBetween, QueryContext,
    Repetition, Row,
};
use sema_planner::QueryPlanner;
use sema_types::{
    CoreConfig, DependencyPath, Direction, GraphEdge, GraphMetrics, GraphNode, TraversalMetrics,
    TraversalPath, TraversalQuery, TraversalResult,
};

use crate::cache::TraversalCache;
use crate::error::{TraverseError, TraverseResult};

/// Maximum hop count served by a bounded repetition; deeper traversals use
/// the store's unbounded operator.
const BOUNDED_REPETITION_DEPTH: u32 = 3;

/// A node with its in/out degree, from a degree snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDegree {
    pub node: GraphNode,
    pub in_degree: u64,
    pub out_degree: u64,
}

impl NodeDegree {
    /// Combined in+out degree.
    pub fn total(&self) -> u64 {
        self.in_degree + self.out_degree
    }
}

/// Executes direct and multi-hop graph queries.
pub struct TraversalEngine {
    store: Arc<dyn GraphStore>,
    planner: Arc<QueryPlanner>,
    config: CoreConfig,
    cache: TraversalCache,
    semaphore: Arc<Semaphore>,
}

impl TraversalEngine {
    /// Create an engine over `store` with its own planner instance.
    pub fn new(store: Arc<dyn GraphStore>, config: CoreConfig) -> Self {
        let planner = Arc::new(QueryPlanner::new(config.clone()));
        Self::with_planner(store, planner, config)
    }

    /// Create an engine sharing an externally owned planner.
    pub fn with_planner(
        store: Arc<dyn GraphStore>,
        planner: Arc<QueryPlanner>,
        config: CoreConfig,
    ) -> Self {
        let cache = TraversalCache::new(config.thresholds.base_cache_ttl);
        let semaphore = Arc::new(Semaphore::new(config.thresholds.max_concurrency.max(1)));
        Self {
            store,
            planner,
            config,
            cache,
            semaphore,
        }
    }

    /// The planner this engine plans and records statistics against.
    pub fn planner(&self) -> &Arc<QueryPlanner> {
        &self.planner
    }

    /// Execute a traversal query.
    ///
    /// Depth-1 queries become a union of one-hop patterns per
    /// (start node × relation), with both directions unioned for
    /// bidirectional queries. Deeper queries become a single path pattern
    /// whose repetition operator is chosen by depth. Nodes are deduplicated
    /// by id in stable row order. Filterless results are cached.
    pub async fn traverse(
        &self,
        query: &TraversalQuery,
        ctx: &QueryContext,
    ) -> TraverseResult<TraversalResult> {
        self.validate(query)?;

        let plan = self.planner.create_execution_plan(query);
        debug!(
            fingerprint = %&plan.fingerprint[..12],
            cost = plan.estimated_cost,
            hints = plan.hints.len(),
            "planned traversal"
        );

        let cacheable = TraversalCache::cacheable(query);
        let key = TraversalCache::key(query);
        if cacheable {
            if let Some(cached) = self.cache.get(&key).await {
                debug!(%key, "traversal cache hit");
                let mut result = (*cached).clone();
                result.metrics.cache_hit = true;
                self.planner.record_execution_stats(
                    &plan.fingerprint,
                    std::time::Duration::ZERO,
                    result.nodes.len(),
                    true,
                );
                return Ok(result);
            }
        }

        let relations = self.ordered_relations(&query.relations);
        let graph_query = if query.max_depth == 1 {
            self.build_hop_query(query, &relations)
        } else {
            self.build_path_query(query, relations)
        };

        let started = Instant::now();
        let rows = self.store.execute(&graph_query, ctx).await?;
        ctx.ensure_active().map_err(TraverseError::from)?;
        let execution = started.elapsed();

        let mut result = if query.max_depth == 1 {
            collect_hop_rows(&rows)
        } else {
            collect_path_rows(&rows)
        };
        if let Some(limit) = query.limit {
            result.nodes.truncate(limit);
        }
        result.query_id = Uuid::now_v7();
        result.execution = execution;
        result.metrics.node_count = result.nodes.len();
        result.metrics.edge_count = result.edges.len();
        result.metrics.path_count = result.paths.len();

        self.planner
            .record_execution_stats(&plan.fingerprint, execution, result.nodes.len(), false);

        if cacheable {
            self.cache.insert(key, Arc::new(result.clone())).await;
        }
        Ok(result)
    }

    /// Find dependency paths from `start` to `end`, one sub-query per
    /// configured relation type.
    ///
    /// Sub-queries run concurrently under the engine's worker pool. A
    /// failing relation is logged and skipped — partial results are
    /// returned — but cancellation and timeout abort the whole call.
    /// Results are sorted ascending by total weight (one weight unit per
    /// hop).
    pub async fn find_dependency_paths(
        &self,
        start: &str,
        end: &str,
        max_depth: u32,
        ctx: &QueryContext,
    ) -> TraverseResult<Vec<DependencyPath>> {
        ctx.ensure_active().map_err(TraverseError::from)?;

        let relations = self.config.relations_by_selectivity();
        let mut handles = Vec::with_capacity(relations.len());
        for relation in &relations {
            let store = self.store.clone();
            let semaphore = self.semaphore.clone();
            let ctx = ctx.clone();
            let query = GraphQuery::PathsBetween(PathsBetween {
                start: start.to_string(),
                end: end.to_string(),
                relation: relation.clone(),
                max_depth,
            });
            handles.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|_| GraphError::Cancelled)?;
                store.execute(&query, &ctx).await
            }));
        }

        // Join in input order, zipping relations with their outputs.
        let mut paths = Vec::new();
        for (relation, handle) in relations.iter().zip(handles) {
            match handle.await {
                Ok(Ok(rows)) => {
                    for row in &rows {
                        if let Some(path) = row.path("path") {
                            paths.push(dependency_path(start, end, path));
                        }
                    }
                }
                Ok(Err(err @ (GraphError::Cancelled | GraphError::Timeout))) => {
                    return Err(err.into());
                }
                Ok(Err(err)) => {
                    warn!(%relation, %err, "dependency path sub-query failed, skipping relation");
                }
                Err(err) => {
                    warn!(%relation, %err, "dependency path task failed, skipping relation");
                }
            }
        }

        paths.sort_by(|a, b| {
            a.total_weight
                .partial_cmp(&b.total_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.nodes.cmp(&b.nodes))
        });
        Ok(paths)
    }

    /// Every edge of the given relation types (all configured relations
    /// when empty).
    pub async fn collect_edges(
        &self,
        relations: &[String],
        ctx: &QueryContext,
    ) -> TraverseResult<Vec<GraphEdge>> {
        let query = GraphQuery::Edges {
            relations: relations.to_vec(),
        };
        let rows = self.store.execute(&query, ctx).await?;
        Ok(rows.iter().filter_map(|r| r.edge("edge").cloned()).collect())
    }

    /// Per-node degree snapshot, sorted by node id.
    pub async fn degree_snapshot(&self, ctx: &QueryContext) -> TraverseResult<Vec<NodeDegree>> {
        let rows = self.store.execute(&GraphQuery::Degrees, ctx).await?;
        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(NodeDegree {
                    node: row.node("node")?.clone(),
                    in_degree: row.scalar_u64("in_degree")?,
                    out_degree: row.scalar_u64("out_degree")?,
                })
            })
            .collect())
    }

    /// Whole-graph metrics: node/edge counts, density, average degree.
    pub async fn get_graph_metrics(&self, ctx: &QueryContext) -> TraverseResult<GraphMetrics> {
        let node_rows = self.store.execute(&GraphQuery::CountNodes, ctx).await?;
        let edge_rows = self.store.execute(&GraphQuery::CountEdges, ctx).await?;

        let node_count = first_count(&node_rows);
        let edge_count = first_count(&edge_rows);
        Ok(GraphMetrics::from_counts(node_count, edge_count))
    }

    fn validate(&self, query: &TraversalQuery) -> TraverseResult<()> {
        if query.start_nodes.is_empty() {
            return Err(TraverseError::InvalidQuery {
                reason: "start node set must not be empty".into(),
            });
        }
        if query.max_depth == 0 {
            return Err(TraverseError::InvalidQuery {
                reason: "max_depth must be at least 1".into(),
            });
        }
        let limit = self.config.thresholds.max_traversal_depth;
        if query.max_depth > limit {
            return Err(TraverseError::InvalidQuery {
                reason: format!("max_depth {} exceeds limit {limit}", query.max_depth),
            });
        }
        Ok(())
    }

    /// Requested relations ordered most-selective first; the full
    /// configured relation set when none were requested.
    fn ordered_relations(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return self.config.relations_by_selectivity();
        }
        let mut relations: Vec<String> = requested.to_vec();
        relations.sort_by(|a, b| {
            let sa = self.config.relation_selectivity.get(a).copied().unwrap_or(1.0);
            let sb = self.config.relation_selectivity.get(b).copied().unwrap_or(1.0);
            sa.partial_cmp(&sb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        relations.dedup();
        relations
    }

    fn build_hop_query(&self, query: &TraversalQuery, relations: &[String]) -> GraphQuery {
        let mut patterns = Vec::new();
        for start in dedup_stable(&query.start_nodes) {
            for relation in relations {
                let directions: &[Direction] = match query.direction {
                    Direction::Bidirectional => &[Direction::Outbound, Direction::Inbound],
                    Direction::Outbound => &[Direction::Outbound],
                    Direction::Inbound => &[Direction::Inbound],
                };
                for direction in directions {
                    patterns.push(HopPattern {
                        start: start.clone(),
                        relation: relation.clone(),
                        direction: *direction,
                        filters: query.filters.clone(),
                        include_metadata: query.include_metadata,
                    });
                }
            }
        }
        GraphQuery::Hops(patterns)
    }

    fn build_path_query(&self, query: &TraversalQuery, relations: Vec<String>) -> GraphQuery {
        let repetition = if query.max_depth <= BOUNDED_REPETITION_DEPTH {
            Repetition::Bounded {
                max: query.max_depth,
            }
        } else {
            Repetition::Unbounded
        };
        GraphQuery::Paths(PathPattern {
            starts: dedup_stable(&query.start_nodes),
            relations,
            direction: query.direction,
            repetition,
            filters: query.filters.clone(),
            limit: query.limit,
            include_metadata: query.include_metadata,
        })
    }
}

/// Deduplicate preserving first-seen order.
fn dedup_stable(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

fn first_count(rows: &[Row]) -> u64 {
    rows.first().and_then(|r| r.scalar_u64("count")).unwrap_or(0)
}

fn empty_result() -> TraversalResult {
    TraversalResult {
        query_id: Uuid::nil(),
        nodes: Vec::new(),
        edges: Vec::new(),
        paths: Vec::new(),
        execution: std::time::Duration::ZERO,
        metrics: TraversalMetrics::default(),
    }
}

fn collect_hop_rows(rows: &[Row]) -> TraversalResult {
    let mut result = empty_result();
    let mut seen_nodes = HashSet::new();
    let mut seen_edges = HashSet::new();

    for row in rows {
        if let Some(node) = row.node("node") {
            if seen_nodes.insert(node.id.clone()) {
                result.nodes.push(node.clone());
            }
        }
        if let Some(edge) = row.edge("edge") {
            let edge_key = (edge.from.clone(), edge.to.clone(), edge.relation.clone());
            if seen_edges.insert(edge_key) {
                result.edges.push(edge.clone());
            }
        }
    }
    result.metrics.max_depth_reached = if result.nodes.is_empty() { 0 } else { 1 };
    result
}

fn collect_path_rows(rows: &[Row]) -> TraversalResult {
    let mut result = empty_result();
    let mut seen_nodes = HashSet::new();
    let mut seen_edges = HashSet::new();
    let mut max_hops = 0usize;

    for row in rows {
        let Some(path) = row.path("path") else {
            continue;
        };
        max_hops = max_hops.max(path.hops());
        result.paths.push(path.clone());

        // Terminal nodes come back with properties; intermediates are
        // known structurally by id only.
        let terminal = row.node("node");
        for (i, node_id) in path.nodes.iter().enumerate() {
            if i == 0 {
                continue; // start nodes are inputs, not results
            }
            if seen_nodes.insert(node_id.clone()) {
                let node = match terminal {
                    Some(t) if &t.id == node_id => t.clone(),
                    _ => GraphNode::new(node_id.clone()),
                };
                result.nodes.push(node);
            }
        }

        // Edges reconstructed in traversal orientation.
        for (i, relation) in path.relations.iter().enumerate() {
            let from = &path.nodes[i];
            let to = &path.nodes[i + 1];
            let edge_key = (from.clone(), to.clone(), relation.clone());
            if seen_edges.insert(edge_key) {
                result
                    .edges
                    .push(GraphEdge::new(from.clone(), to.clone(), relation.clone()));
            }
        }
    }
    result.metrics.max_depth_reached = max_hops as u32;
    result
}

fn dependency_path(start: &str, end: &str, path: &TraversalPath) -> DependencyPath {
    DependencyPath {
        start: start.to_string(),
        end: end.to_string(),
        nodes: path.nodes.clone(),
        relations: path.relations.clone(),
        total_weight: path.hops() as f64,
        is_critical: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sema_graph::InMemoryGraphStore;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn test_config() -> CoreConfig {
        let mut config = CoreConfig::default();
        for (relation, selectivity) in [("depends_on", 0.3), ("references", 0.6)] {
            config
                .relation_identifiers
                .insert(relation.into(), format!("REL_{}", relation.to_uppercase()));
            config
                .relation_selectivity
                .insert(relation.into(), selectivity);
        }
        config
    }

    /// Fixture: A -> B -> C over depends_on, plus A -> C over references.
    fn chain_engine() -> (TraversalEngine, Arc<InMemoryGraphStore>) {
        let store = Arc::new(InMemoryGraphStore::new());
        store.add_edge(GraphEdge::new("A", "B", "depends_on"));
        store.add_edge(GraphEdge::new("B", "C", "depends_on"));
        store.add_edge(GraphEdge::new("A", "C", "references"));
        let engine = TraversalEngine::new(store.clone(), test_config());
        (engine, store)
    }

    fn query(nodes: &[&str], relations: &[&str], depth: u32) -> TraversalQuery {
        TraversalQuery {
            start_nodes: nodes.iter().map(|s| s.to_string()).collect(),
            relations: relations.iter().map(|s| s.to_string()).collect(),
            direction: Direction::Outbound,
            max_depth: depth,
            limit: None,
            filters: BTreeMap::new(),
            include_metadata: false,
        }
    }

    // ---- Validation ----

    #[tokio::test]
    async fn empty_start_set_is_rejected() {
        let (engine, _) = chain_engine();
        let err = engine
            .traverse(&query(&[], &["depends_on"], 1), &QueryContext::unbounded())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), sema_types::ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn zero_and_excessive_depth_are_rejected() {
        let (engine, _) = chain_engine();
        let ctx = QueryContext::unbounded();
        assert!(engine.traverse(&query(&["A"], &[], 0), &ctx).await.is_err());
        assert!(engine.traverse(&query(&["A"], &[], 99), &ctx).await.is_err());
    }

    // ---- Depth-1 traversal ----

    #[tokio::test]
    async fn depth_one_returns_direct_neighbors_only() {
        let (engine, _) = chain_engine();
        let result = engine
            .traverse(&query(&["A"], &["depends_on"], 1), &QueryContext::unbounded())
            .await
            .unwrap();

        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B"]);
        assert_eq!(result.metrics.max_depth_reached, 1);
        assert!(!result.metrics.cache_hit);
    }

    #[tokio::test]
    async fn bidirectional_unions_both_directions() {
        let (engine, _) = chain_engine();
        let mut q = query(&["B"], &["depends_on"], 1);
        q.direction = Direction::Bidirectional;
        let result = engine.traverse(&q, &QueryContext::unbounded()).await.unwrap();

        let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn all_configured_relations_used_when_none_requested() {
        let (engine, _) = chain_engine();
        let result = engine
            .traverse(&query(&["A"], &[], 1), &QueryContext::unbounded())
            .await
            .unwrap();

        let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["B", "C"]);
    }

    // ---- Multi-hop traversal ----

    #[tokio::test]
    async fn depth_two_reaches_transitive_nodes() {
        let (engine, _) = chain_engine();
        let result = engine
            .traverse(&query(&["A"], &["depends_on"], 2), &QueryContext::unbounded())
            .await
            .unwrap();

        let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(result.metrics.max_depth_reached, 2);
        assert_eq!(result.paths.len(), 2);
        assert!(!result.edges.is_empty());
    }

    #[tokio::test]
    async fn node_limit_is_applied() {
        let (engine, _) = chain_engine();
        let mut q = query(&["A"], &["depends_on"], 2);
        q.limit = Some(1);
        let result = engine.traverse(&q, &QueryContext::unbounded()).await.unwrap();
        assert_eq!(result.nodes.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_start_nodes_do_not_duplicate_results() {
        let (engine, _) = chain_engine();
        let result = engine
            .traverse(
                &query(&["A", "A"], &["depends_on"], 1),
                &QueryContext::unbounded(),
            )
            .await
            .unwrap();
        assert_eq!(result.nodes.len(), 1);
    }

    // ---- Caching ----

    #[tokio::test]
    async fn repeated_query_is_served_from_cache() {
        let (engine, store) = chain_engine();
        let ctx = QueryContext::unbounded();
        let q = query(&["A"], &["depends_on"], 1);

        let first = engine.traverse(&q, &ctx).await.unwrap();
        assert!(!first.metrics.cache_hit);
        let executions_after_first = store.executions();

        let second = engine.traverse(&q, &ctx).await.unwrap();
        assert!(second.metrics.cache_hit);
        assert_eq!(store.executions(), executions_after_first);
        assert_eq!(second.nodes, first.nodes);
    }

    #[tokio::test]
    async fn cache_entries_expire() {
        let store = Arc::new(InMemoryGraphStore::new());
        store.add_edge(GraphEdge::new("A", "B", "depends_on"));
        let mut config = test_config();
        config.thresholds.base_cache_ttl = Duration::from_millis(20);
        let engine = TraversalEngine::new(store.clone(), config);
        let ctx = QueryContext::unbounded();
        let q = query(&["A"], &["depends_on"], 1);

        engine.traverse(&q, &ctx).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        let again = engine.traverse(&q, &ctx).await.unwrap();
        assert!(!again.metrics.cache_hit);
        assert_eq!(store.executions(), 2);
    }

    #[tokio::test]
    async fn executions_feed_the_planner_statistics() {
        let (engine, _) = chain_engine();
        let ctx = QueryContext::unbounded();
        let q = query(&["A"], &["depends_on"], 1);

        engine.traverse(&q, &ctx).await.unwrap(); // miss
        engine.traverse(&q, &ctx).await.unwrap(); // hit

        let fingerprint = sema_planner::fingerprint(&q);
        let stats = engine.planner().stats(&fingerprint).unwrap();
        assert_eq!(stats.executions, 2);
        assert!((stats.cache_hit_rate - 0.5).abs() < 1e-9);
        assert!((stats.avg_result_count - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn filtered_queries_bypass_the_cache() {
        let (engine, store) = chain_engine();
        let ctx = QueryContext::unbounded();
        let mut q = query(&["A"], &["depends_on"], 1);
        q.filters.insert("critical".into(), serde_json::json!(true));

        engine.traverse(&q, &ctx).await.unwrap();
        engine.traverse(&q, &ctx).await.unwrap();
        assert_eq!(store.executions(), 2);
    }

    // ---- Dependency paths ----

    #[tokio::test]
    async fn dependency_paths_found_per_relation() {
        let (engine, _) = chain_engine();
        let paths = engine
            .find_dependency_paths("A", "C", 5, &QueryContext::unbounded())
            .await
            .unwrap();

        // references gives A -> C (weight 1), depends_on gives A -> B -> C
        // (weight 2); sorted ascending by weight.
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].total_weight, 1.0);
        assert_eq!(paths[0].relations, vec!["references"]);
        assert_eq!(paths[1].total_weight, 2.0);
        assert_eq!(paths[1].nodes, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn failing_relation_is_skipped_with_partial_results() {
        let (engine, store) = chain_engine();
        store.fail_relation("references");

        let paths = engine
            .find_dependency_paths("A", "C", 5, &QueryContext::unbounded())
            .await
            .unwrap();

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].relations, vec!["depends_on", "depends_on"]);
    }

    #[tokio::test]
    async fn cancellation_aborts_dependency_paths() {
        let (engine, _) = chain_engine();
        let ctx = QueryContext::unbounded();
        ctx.cancel();
        let err = engine
            .find_dependency_paths("A", "C", 5, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), sema_types::ErrorKind::Cancelled);
    }

    // ---- Metrics & snapshots ----

    #[tokio::test]
    async fn graph_metrics_from_fixture() {
        let (engine, _) = chain_engine();
        let metrics = engine
            .get_graph_metrics(&QueryContext::unbounded())
            .await
            .unwrap();
        assert_eq!(metrics.node_count, 3);
        assert_eq!(metrics.edge_count, 3);
        assert!((metrics.average_degree - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn metrics_guards_for_empty_graph() {
        let store = Arc::new(InMemoryGraphStore::new());
        let engine = TraversalEngine::new(store, test_config());
        let metrics = engine
            .get_graph_metrics(&QueryContext::unbounded())
            .await
            .unwrap();
        assert_eq!(metrics.density, 0.0);
        assert_eq!(metrics.average_degree, 0.0);
    }

    #[tokio::test]
    async fn degree_snapshot_reports_hubs() {
        let (engine, _) = chain_engine();
        let degrees = engine
            .degree_snapshot(&QueryContext::unbounded())
            .await
            .unwrap();
        let a = degrees.iter().find(|d| d.node.id == "A").unwrap();
        assert_eq!(a.out_degree, 2);
        assert_eq!(a.in_degree, 0);
        assert_eq!(a.total(), 2);
    }

    #[tokio::test]
    async fn collect_edges_filters_by_relation() {
        let (engine, _) = chain_engine();
        let edges = engine
            .collect_edges(&["depends_on".to_string()], &QueryContext::unbounded())
            .await
            .unwrap();
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.relation == "depends_on"));
    }
}
