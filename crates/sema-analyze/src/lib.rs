//! Dependency analysis for Sema.
//!
//! Built entirely on the traversal engine: change-impact analysis,
//! circular-dependency detection, critical-path identification, and orphan
//! detection. All methods are advisory and fail open — store failures are
//! logged and produce empty or partial results — but cancellation and
//! timeouts always surface.

pub mod analyzer;
pub mod cycles;
pub mod report;

pub use analyzer::DependencyAnalyzer;
pub use cycles::{cycle_severity, find_cycles};
pub use report::{ChangeType, ImpactReport};
