//! Configuration for noted paths and build settings.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (NOTED_HOME, NOTED_NOTES)
//! 2. Config file (.noted/config.yaml)
//! 3. Defaults (~/.noted)
//!
//! Config file discovery:
//! - Searches current directory and parents for .noted/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub linkcheck: Option<LinkcheckConfig>,
    #[serde(default)]
    pub formats: Option<FormatsConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Tool state directory (relative to config file)
    pub home: Option<String>,
    /// Notes source directory (relative to config file)
    pub notes: Option<String>,
    /// Rendered output directory (relative to config file)
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkcheckConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatsConfig {
    pub markdown: Option<bool>,
    pub html: Option<bool>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to noted home (tool state)
    pub home: PathBuf,
    /// Absolute path to the notes source tree
    pub notes: PathBuf,
    /// Absolute path to the rendered output directory
    pub output: PathBuf,
    /// Ignore globs for note files
    pub ignore: Vec<String>,
    /// Link checker settings
    pub linkcheck: LinkcheckSettings,
    /// Which output formats to render
    pub formats: FormatSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LinkcheckSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for LinkcheckSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("noted-linkcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormatSettings {
    pub markdown: bool,
    pub html: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            markdown: true,
            html: true,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".noted").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".noted");

    // Check for config file
    let config_file = find_config_file();

    let (home, notes, output, ignore, linkcheck, formats) = if let Some(ref config_path) =
        config_file
    {
        // Config file found - use it as base
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .noted/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent() // .noted/
            .and_then(|p| p.parent()) // project root
            .unwrap_or(Path::new("."));

        // Resolve home path
        let home = if let Ok(env_home) = std::env::var("NOTED_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            // home is relative to .noted/ directory
            let noted_dir = config_path.parent().unwrap_or(Path::new("."));
            resolve_path(noted_dir, home_path)
        } else {
            default_home.clone()
        };

        // Resolve notes path
        let notes = if let Ok(env_notes) = std::env::var("NOTED_NOTES") {
            PathBuf::from(env_notes)
        } else if let Some(ref notes_path) = config.paths.notes {
            resolve_path(base_dir, notes_path)
        } else {
            home.join("notes")
        };

        // Resolve output path
        let output = if let Some(ref output_path) = config.paths.output {
            resolve_path(base_dir, output_path)
        } else {
            home.join("_build")
        };

        let linkcheck = LinkcheckSettings {
            timeout_seconds: config
                .linkcheck
                .as_ref()
                .and_then(|l| l.timeout_seconds)
                .unwrap_or(10),
            user_agent: config
                .linkcheck
                .as_ref()
                .and_then(|l| l.user_agent.clone())
                .unwrap_or_else(|| LinkcheckSettings::default().user_agent),
        };

        let formats = FormatSettings {
            markdown: config
                .formats
                .as_ref()
                .and_then(|f| f.markdown)
                .unwrap_or(true),
            html: config.formats.as_ref().and_then(|f| f.html).unwrap_or(true),
        };

        (home, notes, output, config.ignore, linkcheck, formats)
    } else {
        // No config file - use env vars or defaults
        let home = std::env::var("NOTED_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        let notes = std::env::var("NOTED_NOTES")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join("notes"));

        let output = home.join("_build");

        (
            home,
            notes,
            output,
            Vec::new(),
            LinkcheckSettings::default(),
            FormatSettings::default(),
        )
    };

    Ok(ResolvedConfig {
        home,
        notes,
        output,
        ignore,
        linkcheck,
        formats,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

// ============================================================================
// Convenience functions
// ============================================================================

/// Get the noted home directory (tool state).
pub fn noted_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the notes source directory.
pub fn notes_dir() -> Result<PathBuf> {
    Ok(config()?.notes.clone())
}

/// Get the rendered output directory.
pub fn output_dir() -> Result<PathBuf> {
    Ok(config()?.output.clone())
}

/// Get the build manifest path ($NOTED_HOME/manifest.json)
pub fn manifest_path() -> Result<PathBuf> {
    Ok(config()?.home.join("manifest.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let noted_dir = temp.path().join(".noted");
        std::fs::create_dir_all(&noted_dir).unwrap();

        let config_path = noted_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./
  notes: ../notes
  output: ../_build
ignore:
  - "**/_drafts/**"
linkcheck:
  timeout_seconds: 5
formats:
  html: false
"#
        )
        .unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.home, Some("./".to_string()));
        assert_eq!(config.paths.notes, Some("../notes".to_string()));
        assert_eq!(config.ignore, vec!["**/_drafts/**".to_string()]);
        assert_eq!(config.linkcheck.unwrap().timeout_seconds, Some(5));
        assert_eq!(config.formats.unwrap().html, Some(false));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }

    #[test]
    fn test_default_settings() {
        let linkcheck = LinkcheckSettings::default();
        assert_eq!(linkcheck.timeout_seconds, 10);
        assert!(linkcheck.user_agent.starts_with("noted-linkcheck/"));

        let formats = FormatSettings::default();
        assert!(formats.markdown);
        assert!(formats.html);
    }
}
