//! The team-wide catalog index.
//!
//! One `models_index.json` per repository root: a lightweight listing of
//! every model family and its latest-known release, cheap enough to load
//! for browsing without touching per-release metadata.

use serde::{Deserialize, Serialize};

use super::null_default;

/// Index of all model families in a repository.
///
/// Entries keep insertion order; the order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelIndex {
    /// All known model families
    #[serde(default, deserialize_with = "null_default")]
    pub entries: Vec<IndexEntry>,
}

impl ModelIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the entry with the given id, if any.
    ///
    /// Ids are unique: at most one entry matches.
    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Mutable variant of [`get`](Self::get)
    pub fn get_mut(&mut self, id: &str) -> Option<&mut IndexEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Insert or replace an entry, keyed by id
    pub fn upsert(&mut self, entry: IndexEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Remove the entry with the given id
    pub fn remove(&mut self, id: &str) -> Option<IndexEntry> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .map(|pos| self.entries.remove(pos))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One row of the index, one per model family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// Stable unique key for the model family
    #[serde(default)]
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Latest published release version ("MAJOR.MINOR.PATCH" or unknown)
    #[serde(default)]
    pub latest_version: String,

    /// Short description for browsing
    #[serde(default)]
    pub description: String,

    /// Search tags; a set, order irrelevant
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,

    /// Last time any release of this family changed, in epoch ticks
    #[serde(default)]
    pub updated_time_ticks: i64,

    /// When the latest release was published, in epoch ticks
    #[serde(default)]
    pub release_time_ticks: i64,
}

impl IndexEntry {
    /// Create an entry with an id and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the latest version
    pub fn with_latest_version(mut self, version: impl Into<String>) -> Self {
        self.latest_version = version.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
