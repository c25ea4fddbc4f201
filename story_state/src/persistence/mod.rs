//! Persistence of the history log.
//!
//! The core only produces and consumes a JSON blob; where that blob lives is
//! up to a [`PersistenceAdapter`].

mod storage;

pub use storage::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::HistoryEntry;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format: {0}")]
    InvalidFormat(String),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save format version.
pub const SAVE_VERSION: u32 = 1;

/// Durable storage for one saved history blob.
pub trait PersistenceAdapter {
    /// Store the blob, replacing any previous one.
    fn save(&mut self, blob: &str) -> Result<(), PersistError>;

    /// Fetch the stored blob, if there is one.
    fn load(&self) -> Result<Option<String>, PersistError>;

    /// Check if a blob is stored.
    fn exists(&self) -> bool;

    /// Remove the stored blob. Clearing empty storage succeeds.
    fn clear(&mut self) -> Result<(), PersistError>;
}

/// A saved history with everything needed to resume play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedHistory {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// Every history entry, oldest first.
    pub entries: Vec<HistoryEntry>,

    /// Cursor at save time. Absent means "resume at the last entry".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
}

/// Either the versioned envelope or a bare array of entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveBlob {
    Versioned(SavedHistory),
    Bare(Vec<HistoryEntry>),
}

impl SavedHistory {
    /// Create a saved history at the current format version.
    pub fn new(entries: Vec<HistoryEntry>, cursor: Option<usize>) -> Self {
        Self {
            version: SAVE_VERSION,
            entries,
            cursor,
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a blob written by [`SavedHistory::to_json`] or a bare entry array.
    pub fn from_json(blob: &str) -> Result<Self, PersistError> {
        let saved = match serde_json::from_str::<SaveBlob>(blob) {
            Ok(SaveBlob::Versioned(saved)) => saved,
            Ok(SaveBlob::Bare(entries)) => Self::new(entries, None),
            // Re-parse strictly so the error names what was wrong.
            Err(_) => serde_json::from_str::<Self>(blob)?,
        };

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// The cursor to resume at, or `None` for an empty history.
    pub fn resume_cursor(&self) -> Result<Option<usize>, PersistError> {
        if self.entries.is_empty() {
            return Ok(None);
        }

        let last = self.entries.len() - 1;
        match self.cursor {
            None => Ok(Some(last)),
            Some(cursor) if cursor <= last => Ok(Some(cursor)),
            Some(cursor) => Err(PersistError::InvalidFormat(format!(
                "cursor {} is past the last entry ({})",
                cursor, last
            ))),
        }
    }
}
