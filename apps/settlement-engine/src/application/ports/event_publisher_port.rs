//! Event Publisher Port (Driven Port)
//!
//! Interface for publishing settlement events to external systems.

use crate::domain::settlement::SettlementEvent;

/// Event publishing error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventPublishError {
    /// Serialization error.
    #[error("Event serialization error: {message}")]
    SerializationError { message: String },

    /// Publishing failed.
    #[error("Event publish failed: {message}")]
    PublishFailed { message: String },
}

/// Port for publishing settlement events.
pub trait EventPublisherPort: Send + Sync {
    /// Publish settlement events.
    fn publish_events(&self, events: Vec<SettlementEvent>) -> Result<(), EventPublishError>;

    /// Publish a single settlement event.
    fn publish_event(&self, event: SettlementEvent) -> Result<(), EventPublishError> {
        self.publish_events(vec![event])
    }
}

/// No-op event publisher.
#[derive(Debug, Clone, Default)]
pub struct NoOpEventPublisher;

impl EventPublisherPort for NoOpEventPublisher {
    fn publish_events(&self, _events: Vec<SettlementEvent>) -> Result<(), EventPublishError> {
        Ok(())
    }
}
