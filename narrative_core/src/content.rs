//! Content units - the named pieces of narrative the engine moves between.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named unit of narrative content.
///
/// The engine never renders `source`; it only looks inside it for an
/// embedded requirement block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    pub name: String,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Raw authored text.
    pub source: String,
}

impl ContentUnit {
    /// Create a new content unit.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            source: source.into(),
        }
    }

    /// Add a tag to this unit.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags to this unit.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Check if this unit carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Get the trimmed text between `<tag>` and `</tag>` in the source.
    pub fn requirement_block(&self, tag: &str) -> Option<&str> {
        let open = format!("<{}>", tag);
        let close = format!("</{}>", tag);

        let start = self.source.find(&open)? + open.len();
        let end = start + self.source[start..].find(&close)?;
        Some(self.source[start..end].trim())
    }
}

/// Resolves content by name.
pub trait ContentLookup {
    fn get_content_by_name(&self, name: &str) -> Option<&ContentUnit>;

    /// Check if content with this name exists.
    fn contains_content(&self, name: &str) -> bool {
        self.get_content_by_name(name).is_some()
    }
}

/// All content units of a story, in authored order.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    units: Vec<ContentUnit>,

    /// Index: name -> position in `units`.
    by_name: HashMap<String, usize>,
}

impl ContentLibrary {
    /// Create a new empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a unit. A unit with the same name is replaced in place and
    /// returned.
    pub fn insert(&mut self, unit: ContentUnit) -> Option<ContentUnit> {
        if let Some(&index) = self.by_name.get(&unit.name) {
            return Some(std::mem::replace(&mut self.units[index], unit));
        }

        self.by_name.insert(unit.name.clone(), self.units.len());
        self.units.push(unit);
        None
    }

    /// Get a unit by name.
    pub fn get(&self, name: &str) -> Option<&ContentUnit> {
        self.by_name.get(name).map(|&index| &self.units[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate over units in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentUnit> {
        self.units.iter()
    }

    /// Get all unit names in authored order.
    pub fn names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl ContentLookup for ContentLibrary {
    fn get_content_by_name(&self, name: &str) -> Option<&ContentUnit> {
        self.get(name)
    }
}

impl FromIterator<ContentUnit> for ContentLibrary {
    fn from_iter<I: IntoIterator<Item = ContentUnit>>(iter: I) -> Self {
        let mut library = Self::new();
        for unit in iter {
            library.insert(unit);
        }
        library
    }
}
