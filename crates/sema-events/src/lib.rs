//! Change-event contract for Sema.
//!
//! Branch creation, deletion, and merges emit a [`ChangeEvent`] to an
//! external [`EventPublisher`] collaborator (broker, outbox — owned outside
//! this core). The core must function with no publisher configured:
//! [`NoopPublisher`] is the default, and publish failures are logged by the
//! caller, never propagated into the operation's result.

pub mod event;
pub mod publisher;

pub use event::{ChangeEvent, EventKind};
pub use publisher::{EventPublisher, NoopPublisher, PublishError};
