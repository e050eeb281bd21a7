//! Binding rows returned by the store.
//!
//! A [`Row`] is an ordered map of column name to [`GraphValue`]. Column
//! conventions (documented on [`GraphStore`](crate::traits::GraphStore)):
//! `"node"`, `"edge"`, `"path"`, `"count"`, `"in_degree"`, `"out_degree"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sema_types::{GraphEdge, GraphNode, TraversalPath};

/// One bound value inside a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GraphValue {
    Node(GraphNode),
    Edge(GraphEdge),
    Path(TraversalPath),
    Scalar(serde_json::Value),
}

/// An ordered binding row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: BTreeMap<String, GraphValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a column, replacing any previous binding of the same name.
    pub fn bind(mut self, column: impl Into<String>, value: GraphValue) -> Self {
        self.columns.insert(column.into(), value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&GraphValue> {
        self.columns.get(column)
    }

    /// The node bound to `column`, if any.
    pub fn node(&self, column: &str) -> Option<&GraphNode> {
        match self.columns.get(column) {
            Some(GraphValue::Node(n)) => Some(n),
            _ => None,
        }
    }

    /// The edge bound to `column`, if any.
    pub fn edge(&self, column: &str) -> Option<&GraphEdge> {
        match self.columns.get(column) {
            Some(GraphValue::Edge(e)) => Some(e),
            _ => None,
        }
    }

    /// The path bound to `column`, if any.
    pub fn path(&self, column: &str) -> Option<&TraversalPath> {
        match self.columns.get(column) {
            Some(GraphValue::Path(p)) => Some(p),
            _ => None,
        }
    }

    /// The scalar bound to `column` interpreted as `u64`, if any.
    pub fn scalar_u64(&self, column: &str) -> Option<u64> {
        match self.columns.get(column) {
            Some(GraphValue::Scalar(v)) => v.as_u64(),
            _ => None,
        }
    }
}
