//! Point-in-time copies of the story variables.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An independent deep copy of every story variable at one moment.
///
/// The snapshot owns its values outright, so later mutation of the live
/// store can never show through it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from an owned variable map.
    pub fn from_map(vars: Map<String, Value>) -> Self {
        Self(vars)
    }

    /// Get a captured variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if a variable was captured.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of captured variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the captured variables.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the snapshot, returning the variable map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Snapshot {
    fn from(vars: Map<String, Value>) -> Self {
        Self::from_map(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_serializes_as_plain_object() {
        let mut vars = Map::new();
        vars.insert("gold".to_string(), json!(10));
        let snapshot = Snapshot::from_map(vars);

        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded, json!({"gold": 10}));

        let decoded: Snapshot = serde_json::from_value(json!({"flag": true})).unwrap();
        assert_eq!(decoded.get("flag"), Some(&json!(true)));
        assert_eq!(decoded.len(), 1);
    }
}
