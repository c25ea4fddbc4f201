//! Built-in persistence adapters.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistError, PersistenceAdapter};

/// Keeps the saved blob in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl MemoryStorage {
    /// Create empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistenceAdapter for MemoryStorage {
    fn save(&mut self, blob: &str) -> Result<(), PersistError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, PersistError> {
        Ok(self.blob.clone())
    }

    fn exists(&self) -> bool {
        self.blob.is_some()
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        self.blob = None;
        Ok(())
    }
}

/// Keeps the saved blob in a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create file storage at `path`. Nothing is touched until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the save file location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for FileStorage {
    fn save(&mut self, blob: &str) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, blob)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn clear(&mut self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
