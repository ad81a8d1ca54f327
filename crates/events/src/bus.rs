//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` between the editing session and
//! whatever observes it.

use chrono::{DateTime, Utc};
use navedit_core::dragdrop::DropPosition;
use navedit_core::types::NodeId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Dot-separated names of every event the editor publishes.
pub mod event_types {
    pub const DRAG_STARTED: &str = "drag.started";
    pub const DRAG_TARGET_CHANGED: &str = "drag.target_changed";
    pub const DRAG_COMPLETED: &str = "drag.completed";
    pub const DRAG_CANCELLED: &str = "drag.cancelled";
    pub const NAVIGATION_LOADED: &str = "navigation.loaded";
    pub const NAVIGATION_SAVED: &str = "navigation.saved";
    pub const NAVIGATION_SAVE_FAILED: &str = "navigation.save_failed";
}

// ---------------------------------------------------------------------------
// EditorEvent
// ---------------------------------------------------------------------------

/// Something that happened in an editing session.
///
/// Built with [`EditorEvent::new`] and the `with_*` builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorEvent {
    /// One of the [`event_types`] constants.
    pub event_type: String,

    /// Node the event concerns, for drag events.
    pub node_id: Option<NodeId>,

    /// Event-specific data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl EditorEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            node_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_node(mut self, node_id: impl Into<NodeId>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// `drag.target_changed`; a `None` target means the hover was cleared.
    pub fn drag_target_changed(
        node_id: &str,
        target_id: Option<&str>,
        position: Option<DropPosition>,
    ) -> Self {
        Self::new(event_types::DRAG_TARGET_CHANGED)
            .with_node(node_id)
            .with_payload(serde_json::json!({
                "targetId": target_id,
                "position": position,
            }))
    }

    /// `navigation.save_failed` carrying the error message.
    pub fn save_failed(error: &str) -> Self {
        Self::new(event_types::NAVIGATION_SAVE_FAILED)
            .with_payload(serde_json::json!({ "error": error }))
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use navedit_events::bus::{event_types, EditorEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(EditorEvent::new(event_types::NAVIGATION_SAVED));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// Slow receivers that fall more than `capacity` events behind observe
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: EditorEvent) {
        tracing::trace!(event_type = %event.event_type, "Publishing editor event");
        // A send error only means there are no receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
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
