//! A labeled collection of topic entries, unique by title.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::TopicEntry;

/// Errors from corpus operations.
///
/// All of these indicate authoring or caller mistakes; none are transient,
/// so nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorpusError {
    #[error("duplicate entry title '{title}' in collection '{label}'")]
    DuplicateTitle { title: String, label: String },

    #[error("no entry titled '{title}' in collection '{label}'")]
    NotFound { title: String, label: String },

    #[error("entry title cannot be empty")]
    EmptyTitle,
}

/// An ordered set of entries under one label (typically a year)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCollection {
    /// Collection label, e.g. "2021"
    pub label: String,

    entries: Vec<TopicEntry>,
}

impl TopicCollection {
    /// Create a new empty collection
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            entries: Vec::new(),
        }
    }

    /// Append an entry, preserving insertion order.
    ///
    /// Titles are unique within a collection: adding a second entry with an
    /// existing title fails and leaves the collection unchanged.
    pub fn add_entry(&mut self, entry: TopicEntry) -> Result<(), CorpusError> {
        if self.entries.iter().any(|e| e.title == entry.title) {
            return Err(CorpusError::DuplicateTitle {
                title: entry.title,
                label: self.label.clone(),
            });
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Look up an entry by title
    pub fn get_entry(&self, title: &str) -> Result<&TopicEntry, CorpusError> {
        self.entries
            .iter()
            .find(|e| e.title == title)
            .ok_or_else(|| CorpusError::NotFound {
                title: title.to_string(),
                label: self.label.clone(),
            })
    }

    /// Iterate entries in insertion order.
    ///
    /// Re-iterable without side effects; two passes over an unmodified
    /// collection see the same sequence.
    pub fn entries(&self) -> impl Iterator<Item = &TopicEntry> {
        self.entries.iter()
    }

    /// Search entries by query (case-insensitive substring match over
    /// title, body, and tags)
    pub fn search(&self, query: &str) -> Vec<&TopicEntry> {
        let query_lower = query.to_lowercase();

        self.entries
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&query_lower)
                    || entry.body.to_lowercase().contains(&query_lower)
                    || entry.tags.iter().any(|t| t.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
