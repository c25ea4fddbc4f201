//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! [history]
//! persist_cursor = true
//!
//! [storylets]
//! requirement_tag = "requirements"
//! default_limit = 3
//!
//! [persistence]
//! save_path = "saves/history.json"
//! ```
//!
//! Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use story_state::FileStorage;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history: HistoryConfig,
    pub storylets: StoryletConfig,
    pub persistence: PersistenceConfig,
}

impl EngineConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// History settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Write the cursor into saves so loading resumes where the reader was,
    /// even after undos. When off, loading resumes at the latest entry.
    pub persist_cursor: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            persist_cursor: true,
        }
    }
}

/// Storylet settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryletConfig {
    /// Tag name wrapping requirement blocks in content source.
    pub requirement_tag: String,

    /// Limit used when none is given. 0 means no limit.
    pub default_limit: usize,
}

impl Default for StoryletConfig {
    fn default() -> Self {
        Self {
            requirement_tag: "requirements".to_string(),
            default_limit: 0,
        }
    }
}

/// Save location settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub save_path: Option<PathBuf>,
}

impl PersistenceConfig {
    /// File storage at the configured save path, if one is set.
    pub fn file_storage(&self) -> Option<FileStorage> {
        self.save_path.as_ref().map(FileStorage::new)
    }
}
