//! The typed query object the core constructs.
//!
//! Queries are opaque to the core: components build them structurally and a
//! [`GraphStore`](crate::traits::GraphStore) implementation translates them
//! into whatever its native syntax is. The core never concatenates or parses
//! store query text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sema_types::Direction;

/// Repetition operator for multi-hop path patterns.
///
/// Shallow traversals use a bounded one-or-more repetition; deep traversals
/// fall back to the store's unbounded zero-or-more operator, which most
/// stores plan differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Repetition {
    /// One to `max` hops.
    Bounded { max: u32 },
    /// Zero or more hops, bounded only by the store.
    Unbounded,
}

/// A single one-hop pattern: `start -[relation]-> neighbor`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HopPattern {
    /// Node id the hop starts from.
    pub start: String,
    /// Relation type to follow.
    pub relation: String,
    /// `Outbound` or `Inbound`; bidirectional queries are expressed as a
    /// union of one pattern per direction.
    pub direction: Direction,
    /// Property filters applied to the reached neighbor.
    pub filters: BTreeMap<String, serde_json::Value>,
    /// Whether rows should carry full property maps.
    pub include_metadata: bool,
}

/// A multi-hop path pattern over a relation alternation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathPattern {
    /// Node ids to start from.
    pub starts: Vec<String>,
    /// Relation alternation, ordered most-selective first.
    pub relations: Vec<String>,
    pub direction: Direction,
    pub repetition: Repetition,
    /// Property filters applied to each path's terminal node.
    pub filters: BTreeMap<String, serde_json::Value>,
    /// Optional cap on returned rows.
    pub limit: Option<usize>,
    pub include_metadata: bool,
}

/// A point-to-point path search over a single relation type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathsBetween {
    pub start: String,
    pub end: String,
    pub relation: String,
    pub max_depth: u32,
}

/// The opaque typed query object handed to the store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GraphQuery {
    /// Union of one-hop patterns, answered in pattern order.
    Hops(Vec<HopPattern>),
    /// A multi-hop path pattern.
    Paths(PathPattern),
    /// All paths between two nodes over one relation type.
    PathsBetween(PathsBetween),
    /// Every edge of the given relation types (all edges when empty).
    Edges { relations: Vec<String> },
    /// Per-node in/out degree snapshot.
    Degrees,
    /// Total node count.
    CountNodes,
    /// Total edge count.
    CountEdges,
}

impl GraphQuery {
    /// Relation types this query touches, for diagnostics and fault
    /// attribution. Empty means "all".
    pub fn relations(&self) -> Vec<&str> {
        match self {
            Self::Hops(patterns) => patterns.iter().map(|p| p.relation.as_str()).collect(),
            Self::Paths(p) => p.relations.iter().map(String::as_str).collect(),
            Self::PathsBetween(p) => vec![p.relation.as_str()],
            Self::Edges { relations } => relations.iter().map(String::as_str).collect(),
            Self::Degrees | Self::CountNodes | Self::CountEdges => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_query_lists_relations() {
        let query = GraphQuery::Hops(vec![
            HopPattern {
                start: "A".into(),
                relation: "depends_on".into(),
                direction: Direction::Outbound,
                filters: BTreeMap::new(),
                include_metadata: false,
            },
            HopPattern {
                start: "A".into(),
                relation: "references".into(),
                direction: Direction::Outbound,
                filters: BTreeMap::new(),
                include_metadata: false,
            },
        ]);
        assert_eq!(query.relations(), vec!["depends_on", "references"]);
    }

    #[test]
    fn count_queries_touch_no_relations() {
        assert!(GraphQuery::CountNodes.relations().is_empty());
        assert!(GraphQuery::Degrees.relations().is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let query = GraphQuery::PathsBetween(PathsBetween {
            start: "A".into(),
            end: "B".into(),
            relation: "depends_on".into(),
            max_depth: 4,
        });
        let json = serde_json::to_string(&query).unwrap();
        let back: GraphQuery = serde_json::from_str(&json).unwrap();
        assert_eq!(query, back);
    }
}
