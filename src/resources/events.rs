//! Resource change events
//!
//! The registry decides *when* an event happens and *who* it is for. Delivery
//! belongs to whatever sink is plugged in: the broadcast bus below feeds the
//! MCP notifier, and a bus with no receivers silently drops events.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

use super::types::{ResourceUri, SubscriberId};

/// Events computed by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceEvent {
    /// A resource was added. Addressed to every session, not to subscribers.
    ListChanged,
    /// A resource's content was replaced. Addressed only to `subscribers`,
    /// captured at the moment of the update.
    Updated {
        uri: ResourceUri,
        subscribers: Vec<SubscriberId>,
    },
}

/// Destination for registry events
///
/// `emit` is called while the registry holds its lock, so implementations
/// must not block or call back into the registry.
pub trait ResourceEventSink: Send + Sync {
    fn emit(&self, event: ResourceEvent);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardEvents;

impl ResourceEventSink for DiscardEvents {
    fn emit(&self, event: ResourceEvent) {
        trace!("Discarding resource event: {:?}", event);
    }
}

/// Broadcast-backed event bus for resource events
#[derive(Debug, Clone)]
pub struct ResourceEventBus {
    sender: broadcast::Sender<ResourceEvent>,
}

impl ResourceEventBus {
    /// Create a new event bus with the specified capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of events buffered per receiver
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ResourceEvent> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ResourceEventSink for ResourceEventBus {
    fn emit(&self, event: ResourceEvent) {
        match self.sender.send(event) {
            Ok(receivers) => trace!("Resource event delivered to {} receiver(s)", receivers),
            Err(broadcast::error::SendError(event)) => {
                trace!("No receivers for resource event: {:?}", event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_without_receivers_is_a_no_op() {
        let bus = ResourceEventBus::new(4);
        assert_eq!(bus.receiver_count(), 0);
        bus.emit(ResourceEvent::ListChanged);
    }

    #[tokio::test]
    async fn receivers_see_events_in_order() {
        let bus = ResourceEventBus::new(4);
        let mut rx = bus.subscribe();
        let uri = ResourceUri::generate();

        bus.emit(ResourceEvent::ListChanged);
        bus.emit(ResourceEvent::Updated {
            uri: uri.clone(),
            subscribers: vec![SubscriberId::new("a")],
        });

        assert_eq!(rx.recv().await.ok(), Some(ResourceEvent::ListChanged));
        assert_eq!(
            rx.recv().await.ok(),
            Some(ResourceEvent::Updated {
                uri,
                subscribers: vec![SubscriberId::new("a")],
            })
        );
    }
}
