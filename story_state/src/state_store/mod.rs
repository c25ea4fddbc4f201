//! State store - the observable container of story variables.

mod events;
mod snapshot;

pub use events::*;
pub use snapshot::*;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from restoring the store out of untyped data.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state source must be an object, found {found}")]
    NotAnObject { found: &'static str },
}

type Observer = Box<dyn FnMut(&StateEvent)>;

/// The story variables of one session.
///
/// All mutation goes through [`StateStore::set`] and [`StateStore::delete`],
/// which notify observers synchronously in registration order. Bulk
/// operations ([`StateStore::restore`], [`StateStore::reset`]) replace the
/// contents without per-key notifications.
#[derive(Default)]
pub struct StateStore {
    /// Story variables by name.
    vars: Map<String, Value>,

    /// Registered observers, in registration order.
    observers: Vec<(ObserverId, Observer)>,
}

impl StateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a variable.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Assign a variable, notifying observers if the value actually changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();

        if self.vars.get(&key) == Some(&value) {
            return;
        }

        self.vars.insert(key.clone(), value.clone());
        self.notify(&StateEvent::Changed { key, value });
    }

    /// Remove a variable. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.vars.remove(key).is_none() {
            return false;
        }

        self.notify(&StateEvent::Deleted {
            key: key.to_string(),
        });
        true
    }

    /// Check if a variable is set.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Get the number of variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over variable names.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.vars.keys()
    }

    /// Iterate over all variables.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    /// Borrow the variables as a JSON object map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.vars
    }

    /// Take an independent deep copy of every variable.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_map(self.vars.clone())
    }

    /// Replace all variables with a copy of the snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.vars = snapshot.as_map().clone();
    }

    /// Replace all variables from untyped data.
    ///
    /// The store is left untouched unless `source` is an object.
    pub fn restore_value(&mut self, source: &Value) -> Result<(), StateError> {
        let vars = source.as_object().ok_or(StateError::NotAnObject {
            found: value_kind(source),
        })?;
        self.vars = vars.clone();
        Ok(())
    }

    /// Remove every variable. Observers stay registered.
    pub fn reset(&mut self) {
        self.vars.clear();
    }

    /// Register an observer for change and deletion events.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&StateEvent) + 'static,
    {
        let id = ObserverId::new();
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Get the number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, event: &StateEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("vars", &self.vars)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
