//! The publisher collaborator.

use async_trait::async_trait;

use crate::event::ChangeEvent;

/// Failure to hand an event to the external transport.
///
/// Publish failures never fail the core operation that produced the event;
/// callers log them and continue.
#[derive(Debug, thiserror::Error)]
#[error("event publish failed: {0}")]
pub struct PublishError(pub String);

/// External event sink (broker, outbox). Delivery semantics are owned by
/// the implementation, not this core.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ChangeEvent) -> Result<(), PublishError>;
}

/// Publisher that discards every event. The default when no publisher is
/// configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: &ChangeEvent) -> Result<(), PublishError> {
        Ok(())
    }
}
