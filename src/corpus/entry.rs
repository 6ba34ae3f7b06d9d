//! A single topic entry: one self-contained note.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::collection::CorpusError;

/// A fenced code block lifted out of a note body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    /// Language tag from the fence (`"text"` when the fence is untagged)
    pub language: String,

    /// The code itself, without the fence lines
    pub source: String,
}

impl CodeSample {
    /// Create a new code sample
    pub fn new(language: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source: source.into(),
        }
    }
}

/// An external reference link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Human-readable link text
    pub label: String,

    /// Target URL
    pub url: String,
}

impl Reference {
    /// Create a new reference
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// One self-contained note: prose plus its code samples and references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Entry title (unique within its collection, never empty)
    pub title: String,

    /// Markdown body of the note
    pub body: String,

    /// Code samples in document order
    #[serde(default)]
    pub code_samples: Vec<CodeSample>,

    /// External reference links in document order
    #[serde(default)]
    pub references: Vec<Reference>,

    /// Author-provided tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Last-touched date from the note's front matter
    #[serde(default)]
    pub updated: Option<NaiveDate>,
}

impl TopicEntry {
    /// Create a new entry. Fails if the title is empty or whitespace-only.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, CorpusError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CorpusError::EmptyTitle);
        }

        Ok(Self {
            title,
            body: body.into(),
            code_samples: Vec::new(),
            references: Vec::new(),
            tags: Vec::new(),
            updated: None,
        })
    }

    /// Append a code sample
    pub fn with_code_sample(mut self, sample: CodeSample) -> Self {
        self.code_samples.push(sample);
        self
    }

    /// Append a reference link
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Append a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Set the updated date
    pub fn with_updated(mut self, updated: NaiveDate) -> Self {
        self.updated = Some(updated);
        self
    }

    /// Stable slug for file names and anchors: lowercase, non-alphanumerics
    /// collapsed to single dashes
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        let mut prev_dash = true;

        for c in self.title.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
                prev_dash = false;
            } else if !prev_dash {
                slug.push('-');
                prev_dash = true;
            }
        }

        while slug.ends_with('-') {
            slug.pop();
        }

        slug
    }
}
