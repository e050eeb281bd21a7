//! Graph-store boundary for Sema.
//!
//! The core never speaks the backing store's native query language. It
//! builds an opaque typed [`GraphQuery`] and hands it to a [`GraphStore`]
//! implementation together with a [`QueryContext`] carrying the caller's
//! deadline and cancellation signal. The store answers with ordered binding
//! [`Row`]s.
//!
//! # Modules
//!
//! - [`error`] — Error types for store operations
//! - [`query`] — The typed query object the core constructs
//! - [`value`] — Binding rows and graph values
//! - [`context`] — Deadline + cancellation propagation
//! - [`traits`] — The [`GraphStore`] trait
//! - [`memory`] — In-memory [`InMemoryGraphStore`] for tests

pub mod context;
pub mod error;
pub mod memory;
pub mod query;
pub mod traits;
pub mod value;

pub use context::QueryContext;
pub use error::{GraphError, GraphResult};
pub use memory::InMemoryGraphStore;
pub use query::{GraphQuery, HopPattern, PathPattern, PathsBetween, Repetition};
pub use traits::GraphStore;
pub use value::{GraphValue, Row};
