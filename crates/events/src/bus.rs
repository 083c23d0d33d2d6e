//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`DomainEvent`]s. It is
//! shared via `Arc<EventBus>` across the application; every subscriber gets
//! an independent stream of all events published after it subscribed. The
//! stream is push-based and effectively unbounded over time — a receiver
//! that falls too far behind observes `RecvError::Lagged` and must re-read
//! current state rather than resume mid-stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// A domain event emitted after a committed state change.
///
/// Constructed via [`DomainEvent::new`] and enriched with
/// [`with_entity`](DomainEvent::with_entity),
/// [`with_actor`](DomainEvent::with_actor), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"project.approved"`.
    pub event_type: String,

    /// Source entity kind (e.g. `"project"`, `"bucket"`).
    pub entity_kind: Option<String>,

    /// Source entity id.
    pub entity_id: Option<Uuid>,

    /// Id of the actor that triggered the event.
    pub actor_id: Option<Uuid>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_kind: None,
            entity_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the source entity to the event.
    pub fn with_entity(mut self, kind: impl Into<String>, id: Uuid) -> Self {
        self.entity_kind = Some(kind.into());
        self.entity_id = Some(id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, actor_id: Uuid) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let entity_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();
        let event = DomainEvent::new("project.approved")
            .with_entity("project", entity_id)
            .with_actor(actor_id)
            .with_payload(serde_json::json!({"status": "approved"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "project.approved");
        assert_eq!(received.entity_kind.as_deref(), Some("project"));
        assert_eq!(received.entity_id, Some(entity_id));
        assert_eq!(received.actor_id, Some(actor_id));
        assert_eq!(received.payload["status"], "approved");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DomainEvent::new("bucket.closed"));

        assert_eq!(rx1.recv().await.unwrap().event_type, "bucket.closed");
        assert_eq!(rx2.recv().await.unwrap().event_type, "bucket.closed");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(DomainEvent::new("orphan.event"));
    }
}
