//! Storylet registry - content gated by requirements and ranked by priority.
//!
//! Availability is computed in three steps:
//! 1. **Filter**: Keep entries with a non-empty requirement that matches the state
//! 2. **Rank**: Stable sort by priority, highest first
//! 3. **Limit**: Optionally keep only the first N

mod requirement;

pub use requirement::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Reverse;
use thiserror::Error;

use crate::content::{ContentLookup, ContentUnit};
use crate::predicate::{Predicate, QueryMatcher};
use story_state::StateStore;

/// Errors from registering storylets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no content named '{0}'")]
    UnknownContent(String),

    #[error("'{0}' is already registered as a storylet")]
    DuplicateEntry(String),
}

/// A content unit registered as a storylet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryletEntry {
    /// Name of the content unit.
    pub name: String,

    /// Query the story state must satisfy.
    pub requirement: Map<String, Value>,

    /// Higher priorities are offered first.
    #[serde(default)]
    pub priority: i64,
}

/// Registered storylets, in registration order.
#[derive(Debug, Clone, Default)]
pub struct StoryletRegistry<P = QueryMatcher> {
    entries: Vec<StoryletEntry>,
    evaluator: P,
}

impl StoryletRegistry<QueryMatcher> {
    /// Create an empty registry using the built-in query matcher.
    pub fn new() -> Self {
        Self::with_evaluator(QueryMatcher)
    }

    /// Build a registry from every unit carrying a valid requirement block.
    pub fn from_content<'a, I>(units: I, tag: &str) -> Self
    where
        I: IntoIterator<Item = &'a ContentUnit>,
    {
        let mut registry = Self::new();
        registry.load_content(units, tag);
        registry
    }
}

impl<P: Predicate> StoryletRegistry<P> {
    /// Create an empty registry with a custom evaluator.
    pub fn with_evaluator(evaluator: P) -> Self {
        Self {
            entries: Vec::new(),
            evaluator,
        }
    }

    /// Register every unit whose source has a requirement block.
    ///
    /// Units without a block, with a block that does not parse, or already
    /// registered are skipped. Returns the number of entries added.
    pub fn load_content<'a, I>(&mut self, units: I, tag: &str) -> usize
    where
        I: IntoIterator<Item = &'a ContentUnit>,
    {
        let before = self.entries.len();

        for unit in units {
            if self.includes(&unit.name) {
                continue;
            }
            if let Some(requirement) = Requirement::extract(unit, tag) {
                self.entries.push(StoryletEntry {
                    name: unit.name.clone(),
                    requirement: requirement.query,
                    priority: requirement.priority,
                });
            }
        }

        self.entries.len() - before
    }

    /// Register a storylet for existing content.
    pub fn add_entry<L>(
        &mut self,
        lookup: &L,
        name: &str,
        requirement: Map<String, Value>,
        priority: i64,
    ) -> Result<(), RegistryError>
    where
        L: ContentLookup + ?Sized,
    {
        if !lookup.contains_content(name) {
            return Err(RegistryError::UnknownContent(name.to_string()));
        }
        if self.includes(name) {
            return Err(RegistryError::DuplicateEntry(name.to_string()));
        }

        self.entries.push(StoryletEntry {
            name: name.to_string(),
            requirement,
            priority,
        });
        Ok(())
    }

    /// Unregister a storylet. Returns whether it was registered.
    pub fn remove_entry(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    /// Check if a storylet is registered.
    pub fn includes(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Get a registered storylet.
    pub fn get(&self, name: &str) -> Option<&StoryletEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Get all entries in registration order.
    pub fn entries(&self) -> &[StoryletEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evaluator(&self) -> &P {
        &self.evaluator
    }

    /// Names of the storylets available in the current state, best first.
    ///
    /// A `limit` of 0 means no limit.
    pub fn available(&self, state: &StateStore, limit: usize) -> Vec<&str> {
        self.available_for(state.as_map(), limit)
    }

    /// Like [`StoryletRegistry::available`], against a raw variable map.
    pub fn available_for(&self, vars: &Map<String, Value>, limit: usize) -> Vec<&str> {
        // An empty requirement would match anything; it is never available.
        let mut matching: Vec<&StoryletEntry> = self
            .entries
            .iter()
            .filter(|e| !e.requirement.is_empty())
            .filter(|e| self.evaluator.test(&e.requirement, vars))
            .collect();

        matching.sort_by_key(|e| Reverse(e.priority));
        if limit > 0 {
            matching.truncate(limit);
        }

        matching.into_iter().map(|e| e.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentLibrary;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    fn library(names: &[&str]) -> ContentLibrary {
        names.iter().map(|n| ContentUnit::new(*n, "")).collect()
    }

    fn ranking_registry() -> (ContentLibrary, StoryletRegistry) {
        let library = library(&["X", "Y", "Z"]);
        let mut registry = StoryletRegistry::new();
        registry
            .add_entry(&library, "X", obj(json!({"flag": true})), 1)
            .unwrap();
        registry
            .add_entry(&library, "Y", obj(json!({"flag": true})), 5)
            .unwrap();
        registry
            .add_entry(&library, "Z", obj(json!({"flag": false})), 9)
            .unwrap();
        (library, registry)
    }

    #[test]
    fn test_ranking() {
        let (_, registry) = ranking_registry();
        let mut state = StateStore::new();
        state.set("flag", true);

        assert_eq!(registry.available(&state, 0), vec!["Y", "X"]);
    }

    #[test]
    fn test_limit() {
        let (_, registry) = ranking_registry();
        let mut state = StateStore::new();
        state.set("flag", true);

        assert_eq!(registry.available(&state, 1), vec!["Y"]);
        assert_eq!(registry.available(&state, 10), vec!["Y", "X"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let library = library(&["a", "b", "c"]);
        let mut registry = StoryletRegistry::new();
        for name in ["a", "b", "c"] {
            registry
                .add_entry(&library, name, obj(json!({"ready": true})), 3)
                .unwrap();
        }

        let mut state = StateStore::new();
        state.set("ready", true);
        assert_eq!(registry.available(&state, 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_requirement_never_available() {
        let library = library(&["always"]);
        let mut registry = StoryletRegistry::new();
        registry
            .add_entry(&library, "always", Map::new(), 100)
            .unwrap();

        let mut state = StateStore::new();
        assert!(registry.available(&state, 0).is_empty());
        state.set("anything", 1);
        assert!(registry.available(&state, 0).is_empty());
        assert!(registry.includes("always"));
    }

    #[test]
    fn test_add_entry_errors() {
        let (library, mut registry) = ranking_registry();

        assert_eq!(
            registry.add_entry(&library, "missing", Map::new(), 0),
            Err(RegistryError::UnknownContent("missing".to_string()))
        );
        assert_eq!(
            registry.add_entry(&library, "X", Map::new(), 0),
            Err(RegistryError::DuplicateEntry("X".to_string()))
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_entry() {
        let (_, mut registry) = ranking_registry();

        assert!(registry.remove_entry("Y"));
        assert!(!registry.remove_entry("Y"));
        assert!(!registry.includes("Y"));

        let mut state = StateStore::new();
        state.set("flag", true);
        assert_eq!(registry.available(&state, 0), vec!["X"]);
    }

    #[test]
    fn test_from_content_skips_non_storylets() {
        let library: ContentLibrary = vec![
            ContentUnit::new("hall", "A long hall."),
            ContentUnit::new(
                "cellar",
                r#"<requirements>{"has_key": true, "priority": 2}</requirements>"#,
            ),
            ContentUnit::new("attic", "<requirements>not json</requirements>"),
            ContentUnit::new("garden", r#"<requirements>{"season": "spring"}</requirements>"#),
        ]
        .into_iter()
        .collect();

        let registry = StoryletRegistry::from_content(library.iter(), "requirements");

        assert_eq!(registry.len(), 2);
        assert!(registry.includes("cellar"));
        assert!(registry.includes("garden"));
        assert!(!registry.includes("hall"));
        assert!(!registry.includes("attic"));
        assert_eq!(registry.get("cellar").unwrap().priority, 2);
        assert!(!registry.get("cellar").unwrap().requirement.contains_key("priority"));
    }

    #[test]
    fn test_custom_evaluator() {
        let library = library(&["odd"]);
        let only_gold = |query: &Map<String, Value>, vars: &Map<String, Value>| {
            query.contains_key("gold") && vars.contains_key("gold")
        };
        let mut registry = StoryletRegistry::with_evaluator(only_gold);
        registry
            .add_entry(&library, "odd", obj(json!({"gold": "whatever"})), 0)
            .unwrap();

        let mut state = StateStore::new();
        assert!(registry.available(&state, 0).is_empty());
        state.set("gold", 1);
        assert_eq!(registry.available(&state, 0), vec!["odd"]);
    }
}
