//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Events are published only after the transaction that produced them has
//! committed, so a subscriber never sees a notification that was rolled back.

use caretrack_core::notice::NotificationKind;
use caretrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// Something that happened which live clients may want to hear about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A notification row was stored for `user_id`.
    NotificationCreated {
        notification_id: DbId,
        user_id: DbId,
        kind: NotificationKind,
        title: String,
        message: String,
        created_at: Timestamp,
    },
}

impl DomainEvent {
    /// The user this event is addressed to.
    pub fn recipient(&self) -> DbId {
        match self {
            DomainEvent::NotificationCreated { user_id, .. } => *user_id,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// # Usage
///
/// ```rust
/// use caretrack_events::bus::EventBus;
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
/// assert_eq!(bus.subscriber_count(), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: DomainEvent) {
        match self.sender.send(event) {
            Ok(receivers) => tracing::trace!(receivers, "Event published"),
            // Only means there are zero receivers.
            Err(_) => tracing::trace!("Event dropped, no subscribers"),
        }
    }

    /// Publish a batch in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = DomainEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

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
    use chrono::Utc;

    fn created(notification_id: DbId, user_id: DbId) -> DomainEvent {
        DomainEvent::NotificationCreated {
            notification_id,
            user_id,
            kind: NotificationKind::NewMessage,
            title: "New Message".to_string(),
            message: "Admin replied to your Plumbing request".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(created(10, 3));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.recipient(), 3);
        assert_matches_created(&received, 10);
    }

    fn assert_matches_created(event: &DomainEvent, expected_id: DbId) {
        let DomainEvent::NotificationCreated { notification_id, .. } = event;
        assert_eq!(*notification_id, expected_id);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(created(1, 1));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn publish_all_preserves_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish_all(vec![created(1, 5), created(2, 6), created(3, 7)]);

        for expected in [5, 6, 7] {
            let event = rx.recv().await.expect("should receive");
            assert_eq!(event.recipient(), expected);
        }
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(created(1, 1));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn serializes_with_event_tag() {
        let json = serde_json::to_value(created(4, 2)).unwrap();
        assert_eq!(json["event"], "notification_created");
        assert_eq!(json["kind"], "new_message");
        assert_eq!(json["user_id"], 2);
    }
}
