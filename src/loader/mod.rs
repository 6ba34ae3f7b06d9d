//! Loading the note corpus from a source tree.
//!
//! Each immediate subdirectory of the notes directory is one collection
//! (its name is the label); every `.md` file inside becomes one entry.
//! Files are visited in lexicographic order so insertion order, and with it
//! the rendered output, is reproducible across runs.

pub mod note;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use tokio::fs;
use tracing::{debug, info};

use crate::corpus::TopicCollection;

pub use note::parse_note;

/// Loads collections from a notes directory
#[derive(Debug, Clone)]
pub struct NoteLoader {
    notes_dir: PathBuf,
    ignore: Vec<Pattern>,
}

impl NoteLoader {
    /// Create a loader for the given notes directory
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
            ignore: Vec::new(),
        }
    }

    /// Add ignore globs, matched against paths relative to the notes
    /// directory (e.g. `**/_drafts/**`)
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        for pattern_str in patterns {
            let pattern = Pattern::new(pattern_str)
                .with_context(|| format!("Invalid ignore pattern: {pattern_str}"))?;
            self.ignore.push(pattern);
        }
        Ok(self)
    }

    /// Load every collection, sorted by label
    pub async fn load(&self) -> Result<Vec<TopicCollection>> {
        let mut labels = Vec::new();
        let mut dir = fs::read_dir(&self.notes_dir).await.with_context(|| {
            format!("Failed to read notes directory: {}", self.notes_dir.display())
        })?;

        while let Some(dir_entry) = dir.next_entry().await? {
            let path = dir_entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    labels.push(name.to_string());
                }
            } else {
                debug!("Skipping non-collection file: {}", path.display());
            }
        }

        labels.sort();

        let mut collections = Vec::new();
        for label in labels {
            let collection = self.load_collection(&label).await?;
            collections.push(collection);
        }

        let total: usize = collections.iter().map(|c| c.len()).sum();
        info!("Loaded {} entries across {} collections", total, collections.len());

        Ok(collections)
    }

    /// Load a single collection from `<notes_dir>/<label>/`
    pub async fn load_collection(&self, label: &str) -> Result<TopicCollection> {
        let dir_path = self.notes_dir.join(label);
        let mut files = Vec::new();

        let mut dir = fs::read_dir(&dir_path)
            .await
            .with_context(|| format!("Failed to read collection directory: {}", dir_path.display()))?;

        while let Some(dir_entry) = dir.next_entry().await? {
            let path = dir_entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("md") {
                files.push(path);
            }
        }

        files.sort();

        let mut collection = TopicCollection::new(label);
        for path in files {
            if self.is_ignored(&path) {
                debug!("Ignoring note: {}", path.display());
                continue;
            }

            let text = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read note: {}", path.display()))?;

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled");

            let entry = parse_note(&text, stem)
                .with_context(|| format!("Failed to parse note: {}", path.display()))?;

            collection
                .add_entry(entry)
                .with_context(|| format!("Failed to add note: {}", path.display()))?;
        }

        Ok(collection)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.notes_dir).unwrap_or(path);
        let relative = relative.to_string_lossy();
        self.ignore.iter().any(|p| p.matches(&relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn write_note(dir: &Path, name: &str, text: &str) {
        std_fs::write(dir.join(name), text).unwrap();
    }

    #[tokio::test]
    async fn test_load_corpus_tree() {
        let temp = TempDir::new().unwrap();
        let year = temp.path().join("2021");
        std_fs::create_dir_all(&year).unwrap();

        write_note(&year, "01-kerberos.md", "# Kerberos Module\n\nSPNEGO notes.\n");
        write_note(&year, "02-closures.md", "# Late Binding Closures\n\nCall-time lookup.\n");
        write_note(&year, "README.txt", "not a note");

        let collections = NoteLoader::new(temp.path()).load().await.unwrap();

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].label, "2021");
        let titles: Vec<_> = collections[0].entries().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Kerberos Module", "Late Binding Closures"]);
    }

    #[tokio::test]
    async fn test_ignore_patterns() {
        let temp = TempDir::new().unwrap();
        let year = temp.path().join("2021");
        std_fs::create_dir_all(&year).unwrap();

        write_note(&year, "keep.md", "# Keep\n");
        write_note(&year, "draft-skip.md", "# Skip\n");

        let loader = NoteLoader::new(temp.path())
            .with_ignore_patterns(&["**/draft-*.md".to_string()])
            .unwrap();
        let collections = loader.load().await.unwrap();

        assert_eq!(collections[0].len(), 1);
        assert!(collections[0].get_entry("Keep").is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_title_across_files_errors() {
        let temp = TempDir::new().unwrap();
        let year = temp.path().join("2021");
        std_fs::create_dir_all(&year).unwrap();

        write_note(&year, "a.md", "# Same Title\n");
        write_note(&year, "b.md", "# Same Title\n");

        let err = NoteLoader::new(temp.path()).load().await.unwrap_err();
        assert!(err.to_string().contains("b.md"));
    }

    #[test]
    fn test_invalid_ignore_pattern() {
        assert!(NoteLoader::new("/tmp/notes")
            .with_ignore_patterns(&["[".to_string()])
            .is_err());
    }
}
