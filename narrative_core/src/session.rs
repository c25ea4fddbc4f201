//! Reader sessions - one run of a story.
//!
//! A session owns the story's content, its variables, its history and its
//! storylets. On each transition the caller mutates [`Session::state_mut`],
//! calls [`Session::visit`] to record where the reader went, then asks
//! [`Session::available`] what may come next.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::content::{ContentLibrary, ContentUnit};
use crate::predicate::{Predicate, QueryMatcher};
use crate::storylets::{RegistryError, StoryletRegistry};
use story_state::{HistoryLog, PersistError, PersistenceAdapter, StateStore};

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no content named '{0}'")]
    UnknownContent(String),

    #[error("storylet error: {0}")]
    Registry(#[from] RegistryError),

    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Unique identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reader's run of a story.
#[derive(Debug)]
pub struct Session<P = QueryMatcher> {
    id: SessionId,
    config: EngineConfig,
    library: ContentLibrary,
    state: StateStore,
    history: HistoryLog,
    storylets: StoryletRegistry<P>,
}

impl Session<QueryMatcher> {
    /// Start a session, registering every unit with a requirement block as
    /// a storylet.
    pub fn new(library: ContentLibrary, config: EngineConfig) -> Self {
        Self::with_evaluator(library, config, QueryMatcher)
    }
}

impl<P: Predicate> Session<P> {
    /// Start a session with a custom requirement evaluator.
    pub fn with_evaluator(library: ContentLibrary, config: EngineConfig, evaluator: P) -> Self {
        let mut storylets = StoryletRegistry::with_evaluator(evaluator);
        storylets.load_content(library.iter(), &config.storylets.requirement_tag);

        Self {
            id: SessionId::new(),
            config,
            library,
            state: StateStore::new(),
            history: HistoryLog::new(),
            storylets,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    /// Get the story variables.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    /// Get the story variables for mutation.
    pub fn state_mut(&mut self) -> &mut StateStore {
        &mut self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn storylets(&self) -> &StoryletRegistry<P> {
        &self.storylets
    }

    /// Get the content unit at the history cursor.
    pub fn current(&self) -> Option<&ContentUnit> {
        let entry = self.history.current()?;
        self.library.get(&entry.content_id)
    }

    /// Record a transition to `name` with the current state.
    pub fn visit(&mut self, name: &str) -> Result<(), SessionError> {
        if !self.library.contains(name) {
            return Err(SessionError::UnknownContent(name.to_string()));
        }

        self.history.add(name, &self.state);
        Ok(())
    }

    /// Step back one transition. `None` at the start of history.
    pub fn undo(&mut self) -> Option<String> {
        self.history.undo(&mut self.state).map(str::to_string)
    }

    /// Step forward one transition. `None` at the end of history.
    pub fn redo(&mut self) -> Option<String> {
        self.history.redo(&mut self.state).map(str::to_string)
    }

    /// Check if a content unit has been visited.
    pub fn has_visited(&self, name: &str) -> bool {
        self.history.has_visited(name)
    }

    /// Count visits to a content unit.
    pub fn visited(&self, name: &str) -> usize {
        self.history.visited(name)
    }

    /// Storylets available now, best first.
    ///
    /// `None` uses the configured default limit.
    pub fn available(&self, limit: Option<usize>) -> Vec<&str> {
        let limit = limit.unwrap_or(self.config.storylets.default_limit);
        self.storylets.available(&self.state, limit)
    }

    /// Register a storylet for content in this session's library.
    pub fn add_storylet(
        &mut self,
        name: &str,
        requirement: Map<String, Value>,
        priority: i64,
    ) -> Result<(), SessionError> {
        self.storylets
            .add_entry(&self.library, name, requirement, priority)?;
        Ok(())
    }

    /// Unregister a storylet. Returns whether it was registered.
    pub fn remove_storylet(&mut self, name: &str) -> bool {
        self.storylets.remove_entry(name)
    }

    /// Save the history through an adapter.
    pub fn save<A>(&self, adapter: &mut A) -> Result<(), SessionError>
    where
        A: PersistenceAdapter + ?Sized,
    {
        self.history
            .save(adapter, self.config.history.persist_cursor)?;
        Ok(())
    }

    /// Load the history through an adapter and restore the state it resumes
    /// at. Returns `Ok(false)` when nothing was saved.
    pub fn load<A>(&mut self, adapter: &A) -> Result<bool, SessionError>
    where
        A: PersistenceAdapter + ?Sized,
    {
        Ok(self.history.load(adapter, &mut self.state)?)
    }

    /// Forget all variables and history. Storylets stay registered.
    pub fn reset(&mut self) {
        self.state.reset();
        self.history.reset();
    }
}
