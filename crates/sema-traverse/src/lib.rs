//! Traversal engine for Sema.
//!
//! Executes direct and multi-hop graph queries against a
//! [`GraphStore`](sema_graph::GraphStore), producing deduplicated nodes,
//! edges, paths, and aggregate metrics. Results are cached in a bounded
//! TTL cache; dependency-path searches fan out one sub-query per configured
//! relation over a bounded worker pool and tolerate per-relation failure.

pub mod cache;
pub mod engine;
pub mod error;

pub use cache::TraversalCache;
pub use engine::{NodeDegree, TraversalEngine};
pub use error::{TraverseError, TraverseResult};
