//! History entries - one narrative transition bound to its state.

use serde::{Deserialize, Serialize};

use crate::state_store::Snapshot;

/// One point in narrative history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Name of the content unit shown at this point.
    #[serde(rename = "contentId")]
    pub content_id: String,

    /// Story variables as they were when the transition happened.
    pub snapshot: Snapshot,
}

impl HistoryEntry {
    /// Create a new history entry.
    pub fn new(content_id: impl Into<String>, snapshot: Snapshot) -> Self {
        Self {
            content_id: content_id.into(),
            snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_wire_shape() {
        let snapshot: Snapshot = serde_json::from_value(json!({"gold": 10})).unwrap();
        let entry = HistoryEntry::new("shop", snapshot);

        let encoded = serde_json::to_value(&entry).unwrap();
        assert_eq!(encoded, json!({"contentId": "shop", "snapshot": {"gold": 10}}));
    }
}
