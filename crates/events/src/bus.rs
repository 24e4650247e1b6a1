//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` in the API state. Handlers
//! publish after their write commits; each WebSocket connection holds its
//! own receiver.

use backoffice_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A change that happened to a back-office record.
///
/// Constructed via [`PlatformEvent::new`] and enriched with
/// [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor) and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"purchase_request.signed"`.
    pub event_type: String,

    /// Entity kind that changed (e.g. `"invoice"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// User whose request caused the change.
    pub actor_user_id: Option<DbId>,

    /// Usually the record as it looks after the change.
    pub payload: serde_json::Value,

    pub timestamp: Timestamp,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Serialize `record` into the payload. A record that fails to
    /// serialize leaves a null payload rather than dropping the event.
    pub fn with_record<T: Serialize>(self, record: &T) -> Self {
        let payload = serde_json::to_value(record).unwrap_or_default();
        self.with_payload(payload)
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Whether this event concerns the given entity kind.
    pub fn concerns(&self, entity_type: &str) -> bool {
        self.source_entity_type.as_deref() == Some(entity_type)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use backoffice_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("invoice.created"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. With no subscribers the
    /// event is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_types;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = PlatformEvent::new(event_types::PURCHASE_REQUEST_SIGNED)
            .with_source(event_types::ENTITY_PURCHASE_REQUEST, 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"workflow_status": "pending_nom"}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "purchase_request.signed");
        assert!(received.concerns("purchase_request"));
        assert!(!received.concerns("invoice"));
        assert_eq!(received.source_entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["workflow_status"], "pending_nom");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(PlatformEvent::new(event_types::INVOICE_CREATED));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1.event_type, "invoice.created");
        assert_eq!(e2.event_type, "invoice.created");
    }

    #[tokio::test]
    async fn slow_receiver_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for _ in 0..5 {
            bus.publish(PlatformEvent::new(event_types::EMPLOYEE_CREATED));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new(event_types::EMPLOYEE_DELETED));
    }

    #[test]
    fn with_record_serializes_the_row() {
        #[derive(Serialize)]
        struct Row {
            id: i64,
            client: &'static str,
        }
        let event = PlatformEvent::new(event_types::INVOICE_UPDATED).with_record(&Row {
            id: 3,
            client: "PT Maju",
        });
        assert_eq!(event.payload["client"], "PT Maju");
    }

    #[test]
    fn default_event_has_empty_optional_fields() {
        let event = PlatformEvent::new("bare.event");
        assert!(event.source_entity_type.is_none());
        assert!(event.source_entity_id.is_none());
        assert!(event.actor_user_id.is_none());
        assert!(event.payload.is_object());
    }
}
