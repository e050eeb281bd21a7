//! In-memory graph store for testing and ephemeral use.
//!
//! [`InMemoryGraphStore`] keeps nodes and edges in `RwLock`-protected maps
//! and answers every [`GraphQuery`] variant with deterministically ordered
//! rows. It implements the full [`GraphStore`] trait and is the reference
//! fixture for every crate in the workspace.
//!
//! Two test hooks are provided: [`fail_relation`] makes queries touching a
//! relation fail with `Unavailable`, and [`executions`] counts `execute`
//! calls for cache-hit assertions.
//!
//! [`fail_relation`]: InMemoryGraphStore::fail_relation
//! [`executions`]: InMemoryGraphStore::executions

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use sema_types::{Direction, GraphEdge, GraphNode, TraversalPath};

use crate::context::QueryContext;
use crate::error::{GraphError, GraphResult};
use crate::query::{GraphQuery, HopPattern, PathPattern, PathsBetween, Repetition};
use crate::traits::GraphStore;
use crate::value::{GraphValue, Row};

/// An in-memory implementation of [`GraphStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    nodes: RwLock<HashMap<String, GraphNode>>,
    edges: RwLock<Vec<GraphEdge>>,
    failed_relations: RwLock<HashSet<String>>,
    unavailable: AtomicBool,
    executions: AtomicU64,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any node with the same id.
    pub fn add_node(&self, node: GraphNode) {
        self.nodes
            .write()
            .expect("node table poisoned")
            .insert(node.id.clone(), node);
    }

    /// Insert an edge. Missing endpoint nodes are created bare so fixtures
    /// can be built from edges alone.
    pub fn add_edge(&self, edge: GraphEdge) {
        {
            let mut nodes = self.nodes.write().expect("node table poisoned");
            nodes
                .entry(edge.from.clone())
                .or_insert_with(|| GraphNode::new(edge.from.clone()));
            nodes
                .entry(edge.to.clone())
                .or_insert_with(|| GraphNode::new(edge.to.clone()));
        }
        self.edges.write().expect("edge table poisoned").push(edge);
    }

    /// Test hook: queries touching `relation` fail with `Unavailable`.
    pub fn fail_relation(&self, relation: impl Into<String>) {
        self.failed_relations
            .write()
            .expect("fault table poisoned")
            .insert(relation.into());
    }

    /// Test hook: make every call fail with `Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `execute` calls served so far.
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }

    fn check_faults(&self, query: &GraphQuery) -> GraphResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::Unavailable("store offline".into()));
        }
        let failed = self.failed_relations.read().expect("fault table poisoned");
        for relation in query.relations() {
            if failed.contains(relation) {
                return Err(GraphError::Unavailable(format!(
                    "relation {relation} unavailable"
                )));
            }
        }
        Ok(())
    }

    fn snapshot(&self) -> (HashMap<String, GraphNode>, Vec<GraphEdge>) {
        let nodes = self.nodes.read().expect("node table poisoned").clone();
        let edges = self.edges.read().expect("edge table poisoned").clone();
        (nodes, edges)
    }

    fn answer_hops(&self, patterns: &[HopPattern]) -> Vec<Row> {
        let (nodes, edges) = self.snapshot();
        let mut rows = Vec::new();

        for pattern in patterns {
            let mut matches: Vec<(&GraphEdge, &str)> = edges
                .iter()
                .filter(|e| e.relation == pattern.relation)
                .filter_map(|e| match pattern.direction {
                    Direction::Outbound if e.from == pattern.start => Some((e, e.to.as_str())),
                    Direction::Inbound if e.to == pattern.start => Some((e, e.from.as_str())),
                    Direction::Bidirectional if e.from == pattern.start => {
                        Some((e, e.to.as_str()))
                    }
                    Direction::Bidirectional if e.to == pattern.start => {
                        Some((e, e.from.as_str()))
                    }
                    _ => None,
                })
                .collect();
            matches.sort_by(|(ea, na), (eb, nb)| na.cmp(nb).then_with(|| ea.relation.cmp(&eb.relation)));

            for (edge, neighbor_id) in matches {
                let Some(neighbor) = nodes.get(neighbor_id) else {
                    continue;
                };
                if !node_matches_filters(neighbor, &pattern.filters) {
                    continue;
                }
                rows.push(
                    Row::new()
                        .bind("node", GraphValue::Node(neighbor.clone()))
                        .bind("edge", GraphValue::Edge(edge.clone())),
                );
            }
        }

        rows
    }

    fn answer_paths(&self, pattern: &PathPattern) -> Vec<Row> {
        let (nodes, edges) = self.snapshot();
        let relation_set: HashSet<&str> = pattern.relations.iter().map(String::as_str).collect();
        let max_hops = match pattern.repetition {
            Repetition::Bounded { max } => max as usize,
            // Simple paths are bounded by the node count anyway.
            Repetition::Unbounded => nodes.len().max(1),
        };

        let mut paths = Vec::new();
        for start in &pattern.starts {
            if !nodes.contains_key(start) {
                continue;
            }
            enumerate_paths(
                &edges,
                &relation_set,
                pattern.direction,
                start,
                max_hops,
                &mut paths,
            );
        }
        paths.sort_by(|a, b| a.nodes.cmp(&b.nodes));

        let mut rows = Vec::new();
        for path in paths {
            let Some(terminal) = path.nodes.last().and_then(|id| nodes.get(id)) else {
                continue;
            };
            if !node_matches_filters(terminal, &pattern.filters) {
                continue;
            }
            rows.push(
                Row::new()
                    .bind("path", GraphValue::Path(path.clone()))
                    .bind("node", GraphValue::Node(terminal.clone())),
            );
            if let Some(limit) = pattern.limit {
                if rows.len() >= limit {
                    break;
                }
            }
        }
        rows
    }

    fn answer_paths_between(&self, spec: &PathsBetween) -> Vec<Row> {
        let (_, edges) = self.snapshot();
        let relation_set: HashSet<&str> = std::iter::once(spec.relation.as_str()).collect();

        let mut all = Vec::new();
        enumerate_paths(
            &edges,
            &relation_set,
            Direction::Outbound,
            &spec.start,
            spec.max_depth as usize,
            &mut all,
        );

        let mut hits: Vec<TraversalPath> = all
            .into_iter()
            .filter(|p| p.nodes.last().map(String::as_str) == Some(spec.end.as_str()))
            .collect();
        hits.sort_by(|a, b| a.hops().cmp(&b.hops()).then_with(|| a.nodes.cmp(&b.nodes)));

        hits.into_iter()
            .map(|p| Row::new().bind("path", GraphValue::Path(p)))
            .collect()
    }

    fn answer_edges(&self, relations: &[String]) -> Vec<Row> {
        let (_, edges) = self.snapshot();
        let mut selected: Vec<GraphEdge> = edges
            .into_iter()
            .filter(|e| relations.is_empty() || relations.contains(&e.relation))
            .collect();
        selected.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then_with(|| a.to.cmp(&b.to))
                .then_with(|| a.relation.cmp(&b.relation))
        });
        selected
            .into_iter()
            .map(|e| Row::new().bind("edge", GraphValue::Edge(e)))
            .collect()
    }

    fn answer_degrees(&self) -> Vec<Row> {
        let (nodes, edges) = self.snapshot();
        let mut ids: Vec<&String> = nodes.keys().collect();
        ids.sort();

        ids.into_iter()
            .map(|id| {
                let out_degree = edges.iter().filter(|e| &e.from == id).count() as u64;
                let in_degree = edges.iter().filter(|e| &e.to == id).count() as u64;
                Row::new()
                    .bind("node", GraphValue::Node(nodes[id].clone()))
                    .bind("in_degree", GraphValue::Scalar(in_degree.into()))
                    .bind("out_degree", GraphValue::Scalar(out_degree.into()))
            })
            .collect()
    }
}

/// Property equality match against a node.
fn node_matches_filters(
    node: &GraphNode,
    filters: &BTreeMap<String, serde_json::Value>,
) -> bool {
    filters
        .iter()
        .all(|(k, v)| node.properties.get(k) == Some(v))
}

/// Depth-first enumeration of simple paths from `start`.
///
/// Paths of one to `max_hops` hops are pushed onto `out`; nodes never repeat
/// within a path.
fn enumerate_paths(
    edges: &[GraphEdge],
    relations: &HashSet<&str>,
    direction: Direction,
    start: &str,
    max_hops: usize,
    out: &mut Vec<TraversalPath>,
) {
    let mut stack_nodes = vec![start.to_string()];
    let mut stack_relations: Vec<String> = Vec::new();
    walk(
        edges,
        relations,
        direction,
        max_hops,
        &mut stack_nodes,
        &mut stack_relations,
        out,
    );
}

fn walk(
    edges: &[GraphEdge],
    relations: &HashSet<&str>,
    direction: Direction,
    max_hops: usize,
    stack_nodes: &mut Vec<String>,
    stack_relations: &mut Vec<String>,
    out: &mut Vec<TraversalPath>,
) {
    if stack_relations.len() >= max_hops {
        return;
    }
    let current = stack_nodes.last().expect("path stack never empty").clone();

    let mut steps: Vec<(&GraphEdge, &str)> = edges
        .iter()
        .filter(|e| relations.is_empty() || relations.contains(e.relation.as_str()))
        .filter_map(|e| match direction {
            Direction::Outbound if e.from == current => Some((e, e.to.as_str())),
            Direction::Inbound if e.to == current => Some((e, e.from.as_str())),
            Direction::Bidirectional if e.from == current => Some((e, e.to.as_str())),
            Direction::Bidirectional if e.to == current => Some((e, e.from.as_str())),
            _ => None,
        })
        .collect();
    steps.sort_by(|(ea, na), (eb, nb)| na.cmp(nb).then_with(|| ea.relation.cmp(&eb.relation)));

    for (edge, next) in steps {
        if stack_nodes.iter().any(|n| n == next) {
            continue; // simple paths only
        }
        stack_nodes.push(next.to_string());
        stack_relations.push(edge.relation.clone());
        out.push(TraversalPath {
            nodes: stack_nodes.clone(),
            relations: stack_relations.clone(),
        });
        walk(
            edges,
            relations,
            direction,
            max_hops,
            stack_nodes,
            stack_relations,
            out,
        );
        stack_nodes.pop();
        stack_relations.pop();
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn execute(&self, query: &GraphQuery, ctx: &QueryContext) -> GraphResult<Vec<Row>> {
        ctx.ensure_active()?;
        self.check_faults(query)?;
        self.executions.fetch_add(1, Ordering::SeqCst);

        let rows = match query {
            GraphQuery::Hops(patterns) => self.answer_hops(patterns),
            GraphQuery::Paths(pattern) => self.answer_paths(pattern),
            GraphQuery::PathsBetween(spec) => self.answer_paths_between(spec),
            GraphQuery::Edges { relations } => self.answer_edges(relations),
            GraphQuery::Degrees => self.answer_degrees(),
            GraphQuery::CountNodes => {
                let count = self.nodes.read().expect("node table poisoned").len() as u64;
                vec![Row::new().bind("count", GraphValue::Scalar(count.into()))]
            }
            GraphQuery::CountEdges => {
                let count = self.edges.read().expect("edge table poisoned").len() as u64;
                vec![Row::new().bind("count", GraphValue::Scalar(count.into()))]
            }
        };

        // Cancellation observed mid-query discards the rows built so far.
        ctx.ensure_active()?;
        Ok(rows)
    }

    async fn ping(&self, ctx: &QueryContext) -> GraphResult<()> {
        ctx.ensure_active()?;
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::Unavailable("store offline".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixture: A -> B -> C plus a reference edge A -> C.
    fn chain_store() -> InMemoryGraphStore {
        let store = InMemoryGraphStore::new();
        store.add_edge(GraphEdge::new("A", "B", "depends_on"));
        store.add_edge(GraphEdge::new("B", "C", "depends_on"));
        store.add_edge(GraphEdge::new("A", "C", "references"));
        store
    }

    fn hop(start: &str, relation: &str, direction: Direction) -> HopPattern {
        HopPattern {
            start: start.into(),
            relation: relation.into(),
            direction,
            filters: BTreeMap::new(),
            include_metadata: false,
        }
    }

    #[tokio::test]
    async fn one_hop_outbound_returns_direct_neighbors_only() {
        let store = chain_store();
        let query = GraphQuery::Hops(vec![hop("A", "depends_on", Direction::Outbound)]);
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node("node").unwrap().id, "B");
    }

    #[tokio::test]
    async fn one_hop_inbound() {
        let store = chain_store();
        let query = GraphQuery::Hops(vec![hop("C", "depends_on", Direction::Inbound)]);
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node("node").unwrap().id, "B");
    }

    #[tokio::test]
    async fn path_query_reaches_transitive_nodes() {
        let store = chain_store();
        let query = GraphQuery::Paths(PathPattern {
            starts: vec!["A".into()],
            relations: vec!["depends_on".into()],
            direction: Direction::Outbound,
            repetition: Repetition::Bounded { max: 3 },
            filters: BTreeMap::new(),
            limit: None,
            include_metadata: false,
        });
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();

        let terminals: Vec<&str> = rows.iter().map(|r| r.node("node").unwrap().id.as_str()).collect();
        assert_eq!(terminals, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn paths_between_finds_the_chain() {
        let store = chain_store();
        let query = GraphQuery::PathsBetween(PathsBetween {
            start: "A".into(),
            end: "C".into(),
            relation: "depends_on".into(),
            max_depth: 5,
        });
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();

        assert_eq!(rows.len(), 1);
        let path = rows[0].path("path").unwrap();
        assert_eq!(path.nodes, vec!["A", "B", "C"]);
        assert_eq!(path.relations, vec!["depends_on", "depends_on"]);
    }

    #[tokio::test]
    async fn degrees_are_per_node() {
        let store = chain_store();
        let rows = store
            .execute(&GraphQuery::Degrees, &QueryContext::unbounded())
            .await
            .unwrap();

        // Sorted by node id: A, B, C.
        assert_eq!(rows[0].node("node").unwrap().id, "A");
        assert_eq!(rows[0].scalar_u64("out_degree"), Some(2));
        assert_eq!(rows[0].scalar_u64("in_degree"), Some(0));
        assert_eq!(rows[2].node("node").unwrap().id, "C");
        assert_eq!(rows[2].scalar_u64("in_degree"), Some(2));
    }

    #[tokio::test]
    async fn counts() {
        let store = chain_store();
        let ctx = QueryContext::unbounded();
        let nodes = store.execute(&GraphQuery::CountNodes, &ctx).await.unwrap();
        let edges = store.execute(&GraphQuery::CountEdges, &ctx).await.unwrap();
        assert_eq!(nodes[0].scalar_u64("count"), Some(3));
        assert_eq!(edges[0].scalar_u64("count"), Some(3));
    }

    #[tokio::test]
    async fn filters_match_node_properties() {
        let store = chain_store();
        let mut critical = GraphNode::new("B");
        critical
            .properties
            .insert("critical".into(), serde_json::json!(true));
        store.add_node(critical);

        let mut filters = BTreeMap::new();
        filters.insert("critical".into(), serde_json::json!(true));
        let query = GraphQuery::Hops(vec![HopPattern {
            start: "A".into(),
            relation: "depends_on".into(),
            direction: Direction::Outbound,
            filters,
            include_metadata: true,
        }]);
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].node("node").unwrap().id, "B");
    }

    #[tokio::test]
    async fn failed_relation_is_surfaced() {
        let store = chain_store();
        store.fail_relation("depends_on");

        let query = GraphQuery::Hops(vec![hop("A", "depends_on", Direction::Outbound)]);
        let err = store
            .execute(&query, &QueryContext::unbounded())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::Unavailable(_)));

        // Other relations still answer.
        let ok = GraphQuery::Hops(vec![hop("A", "references", Direction::Outbound)]);
        assert!(store.execute(&ok, &QueryContext::unbounded()).await.is_ok());
    }

    #[tokio::test]
    async fn cancelled_context_aborts() {
        let store = chain_store();
        let ctx = QueryContext::unbounded();
        ctx.cancel();
        let err = store.execute(&GraphQuery::CountNodes, &ctx).await.unwrap_err();
        assert!(matches!(err, GraphError::Cancelled));
    }

    #[tokio::test]
    async fn execution_counter_increments() {
        let store = chain_store();
        let ctx = QueryContext::unbounded();
        assert_eq!(store.executions(), 0);
        store.execute(&GraphQuery::CountNodes, &ctx).await.unwrap();
        store.execute(&GraphQuery::CountEdges, &ctx).await.unwrap();
        assert_eq!(store.executions(), 2);
    }

    #[tokio::test]
    async fn cycles_do_not_loop_path_enumeration() {
        let store = InMemoryGraphStore::new();
        store.add_edge(GraphEdge::new("A", "B", "depends_on"));
        store.add_edge(GraphEdge::new("B", "A", "depends_on"));

        let query = GraphQuery::Paths(PathPattern {
            starts: vec!["A".into()],
            relations: vec!["depends_on".into()],
            direction: Direction::Outbound,
            repetition: Repetition::Unbounded,
            filters: BTreeMap::new(),
            limit: None,
            include_metadata: false,
        });
        let rows = store.execute(&query, &QueryContext::unbounded()).await.unwrap();
        // Only A -> B; the back edge would revisit A.
        assert_eq!(rows.len(), 1);
    }
}
