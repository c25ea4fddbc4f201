//! Notifications broadcast by the state store.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Handle returned when an observer is registered with a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub Uuid);

impl ObserverId {
    /// Create a new random observer ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutation of a single story variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StateEvent {
    /// A key was assigned a value different from the one it held.
    Changed { key: String, value: Value },

    /// A key was removed from the store.
    Deleted { key: String },
}

impl StateEvent {
    /// The key this event concerns.
    pub fn key(&self) -> &str {
        match self {
            StateEvent::Changed { key, .. } | StateEvent::Deleted { key } => key,
        }
    }

    /// Get the event category as a short label.
    pub fn kind(&self) -> &'static str {
        match self {
            StateEvent::Changed { .. } => "change",
            StateEvent::Deleted { .. } => "deletion",
        }
    }
}

impl std::fmt::Display for StateEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateEvent::Changed { key, value } => write!(f, "change:{} = {}", key, value),
            StateEvent::Deleted { key } => write!(f, "deletion:{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_key_and_kind() {
        let changed = StateEvent::Changed {
            key: "gold".to_string(),
            value: json!(10),
        };
        assert_eq!(changed.key(), "gold");
        assert_eq!(changed.kind(), "change");

        let deleted = StateEvent::Deleted {
            key: "gold".to_string(),
        };
        assert_eq!(deleted.key(), "gold");
        assert_eq!(deleted.kind(), "deletion");
    }

    #[test]
    fn test_event_display() {
        let changed = StateEvent::Changed {
            key: "flag".to_string(),
            value: json!(true),
        };
        assert_eq!(changed.to_string(), "change:flag = true");
    }

    #[test]
    fn test_observer_ids_are_unique() {
        assert_ne!(ObserverId::new(), ObserverId::new());
    }
}
