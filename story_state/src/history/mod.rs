//! History log - the reversible timeline of narrative transitions.
//!
//! Every transition appends an entry holding a snapshot of the story
//! variables. A cursor marks the live entry; undo and redo move the cursor
//! and restore the state store from the entry it lands on.

mod entry;

pub use entry::*;

use crate::persistence::{PersistError, PersistenceAdapter, SavedHistory};
use crate::state_store::StateStore;

/// Ordered history entries plus the cursor marking the live one.
///
/// Whenever the log is non-empty, `cursor < entries.len()` and the entry at
/// the cursor matches the store as it was left by the last `add`, `undo` or
/// `redo`.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl HistoryLog {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition to `content_id` with the current store contents.
    ///
    /// Always appends at the tail and moves the cursor there. Entries past
    /// the cursor left behind by earlier undos are kept but can no longer be
    /// reached with `redo`.
    pub fn add(&mut self, content_id: impl Into<String>, store: &StateStore) {
        self.entries
            .push(HistoryEntry::new(content_id, store.snapshot()));
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry, restoring its state.
    ///
    /// Returns the content shown at the new position, or `None` at the start
    /// of history (in which case nothing changes).
    pub fn undo(&mut self, store: &mut StateStore) -> Option<&str> {
        if self.entries.is_empty() || self.cursor == 0 {
            return None;
        }

        self.cursor -= 1;
        self.restore_current(store)
    }

    /// Step forward one entry, restoring its state.
    ///
    /// Returns `None` at the end of history (in which case nothing changes).
    pub fn redo(&mut self, store: &mut StateStore) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }

        self.cursor += 1;
        self.restore_current(store)
    }

    /// Check if undo would move the cursor.
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    /// Check if redo would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Check if a content unit appears anywhere in history.
    pub fn has_visited(&self, content_id: &str) -> bool {
        self.entries.iter().any(|e| e.content_id == content_id)
    }

    /// Check if every listed content unit appears in history.
    pub fn has_visited_all<I, S>(&self, content_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        content_ids
            .into_iter()
            .all(|id| self.has_visited(id.as_ref()))
    }

    /// Count the entries for a content unit.
    pub fn visited(&self, content_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.content_id == content_id)
            .count()
    }

    /// Drop all entries and rewind the cursor.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Get the cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get the live entry.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor)
    }

    /// Get all entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the saved form of this history.
    pub fn to_saved(&self, persist_cursor: bool) -> SavedHistory {
        let cursor = if persist_cursor && !self.entries.is_empty() {
            Some(self.cursor)
        } else {
            None
        };
        SavedHistory::new(self.entries.clone(), cursor)
    }

    /// Replace this history with a saved one and restore the store from the
    /// entry it resumes at.
    ///
    /// Validation happens before anything is replaced, so on error both the
    /// history and the store are unchanged.
    pub fn restore_saved(
        &mut self,
        saved: SavedHistory,
        store: &mut StateStore,
    ) -> Result<(), PersistError> {
        match saved.resume_cursor()? {
            None => self.reset(),
            Some(cursor) => {
                self.entries = saved.entries;
                self.cursor = cursor;
                store.restore(&self.entries[cursor].snapshot);
            }
        }
        Ok(())
    }

    /// Write this history through a persistence adapter.
    pub fn save<A>(&self, adapter: &mut A, persist_cursor: bool) -> Result<(), PersistError>
    where
        A: PersistenceAdapter + ?Sized,
    {
        let blob = self.to_saved(persist_cursor).to_json()?;
        adapter.save(&blob)
    }

    /// Read a history through a persistence adapter.
    ///
    /// Returns `Ok(false)` when the adapter holds no save.
    pub fn load<A>(&mut self, adapter: &A, store: &mut StateStore) -> Result<bool, PersistError>
    where
        A: PersistenceAdapter + ?Sized,
    {
        let Some(blob) = adapter.load()? else {
            return Ok(false);
        };

        let saved = SavedHistory::from_json(&blob)?;
        self.restore_saved(saved, store)?;
        Ok(true)
    }

    fn restore_current(&self, store: &mut StateStore) -> Option<&str> {
        let entry = self.entries.get(self.cursor)?;
        store.restore(&entry.snapshot);
        Some(entry.content_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use serde_json::json;

    #[test]
    fn test_add_moves_cursor_to_tail() {
        let store = StateStore::new();
        let mut history = HistoryLog::new();

        history.add("intro", &store);
        history.add("shop", &store);

        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.current().unwrap().content_id, "shop");
    }

    #[test]
    fn test_undo_redo_scenario() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();

        history.add("intro", &store);
        store.set("gold", 10);
        history.add("shop", &store);

        assert_eq!(history.undo(&mut store), Some("intro"));
        assert!(store.get("gold").is_none());

        assert_eq!(history.redo(&mut store), Some("shop"));
        assert_eq!(store.get("gold"), Some(&json!(10)));
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();

        assert_eq!(history.undo(&mut store), None);
        assert_eq!(history.redo(&mut store), None);

        history.add("intro", &store);
        store.set("gold", 5);

        assert_eq!(history.undo(&mut store), None);
        assert_eq!(history.undo(&mut store), None);
        assert_eq!(history.redo(&mut store), None);
        assert_eq!(store.get("gold"), Some(&json!(5)));
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_add_after_undo_appends() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();

        history.add("a", &store);
        history.add("b", &store);
        history.add("c", &store);
        history.undo(&mut store);
        history.undo(&mut store);

        history.add("d", &store);

        let ids: Vec<_> = history.entries().iter().map(|e| e.content_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(history.cursor(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo(&mut store), Some("c"));
    }

    #[test]
    fn test_visit_queries() {
        let store = StateStore::new();
        let mut history = HistoryLog::new();

        history.add("A", &store);
        history.add("B", &store);
        history.add("A", &store);

        assert!(history.has_visited("A"));
        assert!(!history.has_visited("C"));
        assert!(history.has_visited_all(["A", "B"]));
        assert!(!history.has_visited_all(["A", "C"]));
        assert!(history.has_visited_all(Vec::<String>::new()));
        assert_eq!(history.visited("A"), 2);
        assert_eq!(history.visited("C"), 0);
    }

    #[test]
    fn test_can_undo_and_redo() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();
        assert!(!history.can_undo());

        history.add("a", &store);
        history.add("b", &store);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        history.undo(&mut store);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_reset() {
        let store = StateStore::new();
        let mut history = HistoryLog::new();
        history.add("a", &store);
        history.add("b", &store);

        history.reset();

        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
        assert!(history.current().is_none());
    }

    #[test]
    fn test_save_and_load_resume_at_saved_cursor() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();
        history.add("intro", &store);
        store.set("gold", 10);
        history.add("shop", &store);
        history.undo(&mut store);

        let mut storage = MemoryStorage::new();
        history.save(&mut storage, true).unwrap();

        let mut restored_store = StateStore::new();
        let mut restored = HistoryLog::new();
        assert!(restored.load(&storage, &mut restored_store).unwrap());

        assert_eq!(restored.len(), 2);
        assert_eq!(restored.cursor(), 0);
        assert!(restored_store.get("gold").is_none());
        assert_eq!(restored.redo(&mut restored_store), Some("shop"));
    }

    #[test]
    fn test_load_without_cursor_resumes_at_tail() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();
        history.add("intro", &store);
        store.set("gold", 10);
        history.add("shop", &store);
        history.undo(&mut store);

        let mut storage = MemoryStorage::new();
        history.save(&mut storage, false).unwrap();

        let mut restored_store = StateStore::new();
        let mut restored = HistoryLog::new();
        restored.load(&storage, &mut restored_store).unwrap();

        assert_eq!(restored.cursor(), 1);
        assert_eq!(restored_store.get("gold"), Some(&json!(10)));
    }

    #[test]
    fn test_load_from_empty_storage() {
        let mut store = StateStore::new();
        let mut history = HistoryLog::new();
        history.add("intro", &store);

        let storage = MemoryStorage::new();
        assert!(!history.load(&storage, &mut store).unwrap());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_failed_load_leaves_history_untouched() {
        let mut store = StateStore::new();
        store.set("gold", 1);
        let mut history = HistoryLog::new();
        history.add("intro", &store);

        let mut storage = MemoryStorage::new();
        storage
            .save(r#"{"version": 1, "entries": [{"contentId": "x", "snapshot": {}}], "cursor": 4}"#)
            .unwrap();

        assert!(history.load(&storage, &mut store).is_err());
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().unwrap().content_id, "intro");
        assert_eq!(store.get("gold"), Some(&json!(1)));
    }
}
