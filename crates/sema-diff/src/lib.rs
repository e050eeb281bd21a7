//! Diff engine for Sema.
//!
//! Computes structural diffs between branch snapshots, detects
//! irreconcilable overlaps between concurrent change sets, and applies merge
//! strategies.
//!
//! # Key Types
//!
//! - [`SnapshotSource`] — Loads a branch's entity set at one instant
//! - [`DiffEngine`] — Sorted-merge structural diff between two snapshots
//! - [`ConflictResolver`] — Cross-branch conflict detection against a base
//! - [`MergeStrategyExecutor`] — Strategy state machine producing a replay log

pub mod conflict;
pub mod diff;
pub mod error;
pub mod merge;
pub mod snapshot;

pub use conflict::ConflictResolver;
pub use diff::DiffEngine;
pub use error::{DiffError, DiffResult};
pub use merge::MergeStrategyExecutor;
pub use snapshot::{InMemorySnapshotSource, SnapshotSource};
