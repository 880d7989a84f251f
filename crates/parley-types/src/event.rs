//! Event types for the Parley cache event bus.
//!
//! `CacheEvent` is broadcast after every state change the cache applies.
//! All variants are Clone + Send + Sync for use with tokio broadcast channels.

use serde::{Deserialize, Serialize};

/// Events emitted when the session/message cache changes.
///
/// Used by the event bus to tell subscribers (UI, logging) what changed
/// without diffing snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheEvent {
    /// The session list was replaced by a bulk load.
    SessionsLoaded { count: usize },

    /// A newly created session was inserted at the front of the list.
    SessionCreated { session_id: String },

    /// A cached session entry was replaced or merged.
    SessionUpdated { session_id: String },

    /// A session was removed after a successful remote delete.
    SessionDeleted { session_id: String },

    /// The active session changed. `None` means a blank conversation.
    ActiveSessionChanged { session_id: Option<String> },

    /// The message history was replaced with a session's history.
    MessagesLoaded { session_id: String, count: usize },

    /// A message was appended locally.
    MessageAdded { message_id: String },

    /// The message history was emptied.
    MessagesCleared,

    /// A message fetch resolved after the active session moved on and was dropped.
    StaleMessagesDiscarded { session_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_tagging() {
        let event = CacheEvent::MessagesLoaded {
            session_id: "s1".to_string(),
            count: 3,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"messages_loaded\""));
        let parsed: CacheEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_unit_variant_serde() {
        let json = serde_json::to_string(&CacheEvent::MessagesCleared).unwrap();
        assert_eq!(json, r#"{"type":"messages_cleared"}"#);
    }
}
