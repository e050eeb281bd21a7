//! Traversal queries, results, and dependency paths.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of edge traversal relative to the start nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Inbound,
    Bidirectional,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
            Self::Bidirectional => "bidirectional",
        };
        write!(f, "{s}")
    }
}

/// A direct or multi-hop graph query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversalQuery {
    /// Entity ids to start from. Must be non-empty.
    pub start_nodes: Vec<String>,
    /// Relation types to follow. Empty means all configured relations.
    pub relations: Vec<String>,
    pub direction: Direction,
    /// Maximum number of hops. Must be at least 1.
    pub max_depth: u32,
    /// Optional cap on the number of returned nodes.
    pub limit: Option<usize>,
    /// Property filters applied to reached nodes.
    pub filters: BTreeMap<String, serde_json::Value>,
    /// Whether to return node/edge property maps alongside ids.
    pub include_metadata: bool,
}

impl TraversalQuery {
    /// One-hop outbound query from a single node, no filters.
    pub fn neighbors(start: impl Into<String>) -> Self {
        Self {
            start_nodes: vec![start.into()],
            relations: Vec::new(),
            direction: Direction::Outbound,
            max_depth: 1,
            limit: None,
            filters: BTreeMap::new(),
            include_metadata: false,
        }
    }
}

/// A node returned by a traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// Node labels, e.g. entity types.
    pub labels: Vec<String>,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

/// A typed edge returned by a traversal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub relation: String,
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation: relation.into(),
            properties: BTreeMap::new(),
        }
    }

    /// The edge's weight property, defaulting to 1.0.
    pub fn weight(&self) -> f64 {
        self.properties
            .get("weight")
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0)
    }
}

/// An ordered node sequence with per-hop relation labels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversalPath {
    /// Node ids along the path, start first.
    pub nodes: Vec<String>,
    /// Relation label of each hop; `relations.len() == nodes.len() - 1`.
    pub relations: Vec<String>,
}

impl TraversalPath {
    /// Number of hops in the path.
    pub fn hops(&self) -> usize {
        self.relations.len()
    }
}

/// Aggregate metrics for one traversal execution.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub path_count: usize,
    /// Deepest hop actually reached.
    pub max_depth_reached: u32,
    /// Whether the result was served from the traversal cache.
    pub cache_hit: bool,
}

/// Result of a traversal query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversalResult {
    pub query_id: Uuid,
    /// Reached nodes, deduplicated by id, in stable order.
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub paths: Vec<TraversalPath>,
    pub execution: Duration,
    pub metrics: TraversalMetrics,
}

/// Whole-graph shape metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: u64,
    pub edge_count: u64,
    /// `2E / (N(N-1))`, `0.0` when `N <= 1`.
    pub density: f64,
    /// `2E / N`, `0.0` when `N = 0`.
    pub average_degree: f64,
}

impl GraphMetrics {
    /// Compute density and average degree from raw counts, guarding the
    /// degenerate cases.
    pub fn from_counts(node_count: u64, edge_count: u64) -> Self {
        let n = node_count as f64;
        let e = edge_count as f64;
        let density = if node_count <= 1 {
            0.0
        } else {
            2.0 * e / (n * (n - 1.0))
        };
        let average_degree = if node_count == 0 { 0.0 } else { 2.0 * e / n };
        Self {
            node_count,
            edge_count,
            density,
            average_degree,
        }
    }
}

/// An ordered dependency chain between two entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DependencyPath {
    pub start: String,
    pub end: String,
    /// Node ids along the path, start first.
    pub nodes: Vec<String>,
    /// Relation label of each hop.
    pub relations: Vec<String>,
    /// Sum of per-hop edge weights.
    pub total_weight: f64,
    /// Set when the path connects high-degree hubs within the configured
    /// hop budget.
    pub is_critical: bool,
}

impl DependencyPath {
    /// Number of hops in the path.
    pub fn hops(&self) -> usize {
        self.relations.len()
    }
}
