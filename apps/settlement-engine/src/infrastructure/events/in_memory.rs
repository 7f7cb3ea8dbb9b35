//! In-memory event publisher for testing.

use parking_lot::RwLock;

use crate::application::ports::{EventPublishError, EventPublisherPort};
use crate::domain::settlement::SettlementEvent;

/// In-memory implementation of `EventPublisherPort`.
///
/// Keeps every published event in order. Suitable for testing and
/// development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    events: RwLock<Vec<SettlementEvent>>,
}

impl InMemoryEventPublisher {
    /// Create a new empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events published so far.
    #[must_use]
    pub fn events(&self) -> Vec<SettlementEvent> {
        self.events.read().clone()
    }

    /// Get the number of published events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Check if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Drop all recorded events.
    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventPublisherPort for InMemoryEventPublisher {
    fn publish_events(&self, events: Vec<SettlementEvent>) -> Result<(), EventPublishError> {
        for event in &events {
            tracing::debug!(
                event_type = event.event_type(),
                operation_id = %event.operation_id(),
                "Settlement event published"
            );
        }
        self.events.write().extend(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::FlashOpened;
    use crate::domain::shared::{Address, OperationId};
    use chrono::Utc;

    fn opened(id: &str) -> SettlementEvent {
        SettlementEvent::Opened(FlashOpened {
            operation_id: OperationId::new(id),
            caller: Address::from_label("caller"),
            beneficiary: Address::from_label("caller"),
            option: Address::from_label("option"),
            quantity: 10,
            loan_remainder: 0,
            rebate: 4,
            occurred_at: Utc::now(),
        })
    }

    #[test]
    fn records_events_in_order() {
        let publisher = InMemoryEventPublisher::new();
        assert!(publisher.is_empty());

        publisher.publish_event(opened("a")).unwrap();
        publisher
            .publish_events(vec![opened("b"), opened("c")])
            .unwrap();

        let ids: Vec<String> = publisher
            .events()
            .iter()
            .map(|e| e.operation_id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(publisher.len(), 3);
    }

    #[test]
    fn clear_drops_everything() {
        let publisher = InMemoryEventPublisher::new();
        publisher.publish_event(opened("a")).unwrap();
        publisher.clear();
        assert!(publisher.is_empty());
    }
}
