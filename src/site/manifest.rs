//! Build manifest for incremental rebuilds.
//!
//! Records a SHA-256 digest per note source file. A build whose scan
//! matches the stored manifest is skipped unless forced.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

/// Digests of every note source, keyed by path relative to the notes
/// directory (e.g. `2021/kerberos-module.md`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Manifest format version
    pub version: u32,

    /// Source path -> hex SHA-256 of file contents
    pub sources: BTreeMap<String, String>,
}

impl Default for BuildManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildManifest {
    /// Create a new empty manifest
    pub fn new() -> Self {
        Self {
            version: 1,
            sources: BTreeMap::new(),
        }
    }

    /// Scan a notes tree and digest every `.md` file
    pub async fn scan(notes_dir: &Path) -> Result<Self> {
        let mut manifest = Self::new();

        let mut top = fs::read_dir(notes_dir)
            .await
            .with_context(|| format!("Failed to read notes directory: {}", notes_dir.display()))?;

        while let Some(label_entry) = top.next_entry().await? {
            let label_path = label_entry.path();
            if !label_path.is_dir() {
                continue;
            }

            let mut dir = fs::read_dir(&label_path).await?;
            while let Some(note_entry) = dir.next_entry().await? {
                let path = note_entry.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                    continue;
                }

                let bytes = fs::read(&path)
                    .await
                    .with_context(|| format!("Failed to read note: {}", path.display()))?;

                let relative = path
                    .strip_prefix(notes_dir)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");

                manifest.sources.insert(relative, digest(&bytes));
            }
        }

        Ok(manifest)
    }

    /// Load a manifest from disk; a missing file yields an empty manifest
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse manifest JSON")
    }

    /// Save the manifest to disk
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

        Ok(())
    }

    /// Number of tracked sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the manifest tracks nothing
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Hex SHA-256 of a byte slice
pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
