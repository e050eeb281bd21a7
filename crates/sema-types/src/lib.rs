//! Foundation types for Sema.
//!
//! This crate provides the shared data model used throughout the Sema
//! versioning-and-query core. Every other Sema crate depends on `sema-types`.
//!
//! # Key Types
//!
//! - [`Branch`] — Named pointer to a versioned schema-graph snapshot
//! - [`SchemaEntity`] / [`BranchSnapshot`] — Schema content at one instant
//! - [`BranchDiff`] / [`DiffEntry`] / [`Conflict`] — Structural differences
//!   between two snapshots and irreconcilable overlaps
//! - [`TraversalQuery`] / [`TraversalResult`] — Multi-hop graph queries
//! - [`DependencyPath`] / [`SemanticConflict`] — Dependency analysis output
//! - [`ErrorKind`] — The closed error taxonomy shared by all core operations
//! - [`CoreConfig`] — Externally supplied configuration and thresholds

pub mod branch;
pub mod change;
pub mod config;
pub mod entity;
pub mod error;
pub mod semantic;
pub mod traversal;

pub use branch::Branch;
pub use change::{
    AppliedChange, BranchDiff, ChangeKind, Conflict, ConflictKind, DiffEntry, MergeResult,
    MergeStrategy, Severity,
};
pub use config::{CoreConfig, Thresholds};
pub use entity::{BranchSnapshot, SchemaEntity};
pub use error::ErrorKind;
pub use semantic::{ConflictType, MergeDecision, SemanticConflict};
pub use traversal::{
    DependencyPath, Direction, GraphEdge, GraphMetrics, GraphNode, TraversalMetrics, TraversalPath,
    TraversalQuery, TraversalResult,
};
