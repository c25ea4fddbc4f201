//! Requirement blocks embedded in content source.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::content::ContentUnit;

/// Why a requirement block was not accepted.
#[derive(Debug, Error)]
pub enum RequirementError {
    #[error("requirement block is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("requirement block must be an object")]
    NotAnObject,

    #[error("priority must be an integer, found {0}")]
    InvalidPriority(Value),
}

/// A parsed requirement: the query to test plus the storylet's priority.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Requirement {
    pub query: Map<String, Value>,
    pub priority: i64,
}

impl Requirement {
    /// Field inside a requirement block holding the priority.
    pub const PRIORITY_FIELD: &'static str = "priority";

    pub fn new(query: Map<String, Value>, priority: i64) -> Self {
        Self { query, priority }
    }

    /// Parse the JSON text of a requirement block.
    ///
    /// A `priority` field is lifted out of the query; it defaults to 0.
    pub fn parse(text: &str) -> Result<Self, RequirementError> {
        let mut query = match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => map,
            _ => return Err(RequirementError::NotAnObject),
        };

        let priority = match query.remove(Self::PRIORITY_FIELD) {
            None => 0,
            Some(value) => value
                .as_i64()
                .ok_or(RequirementError::InvalidPriority(value))?,
        };

        Ok(Self { query, priority })
    }

    /// Find and parse the requirement block of a content unit.
    ///
    /// `None` means the unit is not a storylet: it has no block, or the
    /// block does not parse.
    pub fn extract(unit: &ContentUnit, tag: &str) -> Option<Self> {
        Self::parse(unit.requirement_block(tag)?).ok()
    }

    /// Check if the query has no conditions.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }
}
