//! Command-line interface for noted.
//!
//! Provides commands for building the site, browsing and searching the
//! corpus, checking reference links, and watching for changes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::fs;
use tracing::info;

use crate::config;
use crate::corpus::TopicCollection;
use crate::linkcheck::{self, HttpProbe};
use crate::loader::NoteLoader;
use crate::site::{BuildManifest, SiteBuilder};
use crate::watch::{NoteWatcher, WatchConfig};

/// noted - developer-notes corpus tool
#[derive(Parser, Debug)]
#[command(name = "noted")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the corpus into the output directory
    Build {
        /// Output directory (overrides config)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Rebuild even when no source changed
        #[arg(short, long)]
        force: bool,
    },

    /// List collections, or one collection's entries
    List {
        /// Collection label (e.g. 2021)
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Show one entry
    Show {
        /// Entry title
        title: String,

        /// Collection label (searches all collections if not given)
        #[arg(short, long)]
        label: Option<String>,

        /// Print the full body instead of a preview
        #[arg(short, long)]
        full: bool,
    },

    /// Search the corpus
    Search {
        /// Search query
        query: String,
    },

    /// Check every reference URL in the corpus
    Linkcheck {
        /// Per-request timeout (overrides config)
        #[arg(long)]
        timeout_seconds: Option<u64>,
    },

    /// Rebuild automatically when notes change
    Watch,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build { out, force } => build_site(out, force).await,
            Commands::List { label } => list_corpus(label).await,
            Commands::Show { title, label, full } => show_entry(&title, label, full).await,
            Commands::Search { query } => search_corpus(&query).await,
            Commands::Linkcheck { timeout_seconds } => check_links(timeout_seconds).await,
            Commands::Watch => watch_notes().await,
            Commands::Config => show_config(),
        }
    }
}

/// Load the whole corpus with the configured ignore globs
async fn load_corpus() -> Result<Vec<TopicCollection>> {
    let cfg = config::config()?;
    NoteLoader::new(&cfg.notes)
        .with_ignore_patterns(&cfg.ignore)?
        .load()
        .await
}

/// Build the site, honoring the build manifest unless forced
async fn build_site(out: Option<PathBuf>, force: bool) -> Result<()> {
    let cfg = config::config()?;
    let out_dir = out.unwrap_or_else(|| cfg.output.clone());
    let manifest_path = config::manifest_path()?;

    let scanned = BuildManifest::scan(&cfg.notes).await?;
    let recorded = BuildManifest::load(&manifest_path).await?;

    if !force && scanned == recorded {
        println!("Up to date ({} sources unchanged)", scanned.len());
        return Ok(());
    }

    let collections = load_corpus().await?;
    let pages = SiteBuilder::from_formats(&cfg.formats).build(&collections);

    fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    for page in &pages {
        let path = out_dir.join(&page.relative_path);
        fs::write(&path, &page.content)
            .await
            .with_context(|| format!("Failed to write page: {}", path.display()))?;
    }

    scanned.save(&manifest_path).await?;

    info!("Wrote {} pages to {}", pages.len(), out_dir.display());
    println!("Built {} pages -> {}", pages.len(), out_dir.display());

    Ok(())
}

/// List collections, or the entries of one collection
async fn list_corpus(label: Option<String>) -> Result<()> {
    let collections = load_corpus().await?;

    match label {
        Some(label) => {
            let collection = collections
                .iter()
                .find(|c| c.label == label)
                .with_context(|| format!("No collection labeled '{label}'"))?;

            println!("Collection {} ({} entries):", collection.label, collection.len());
            for entry in collection.entries() {
                println!(
                    "  {}  [{} code sample(s), {} reference(s)]",
                    entry.title,
                    entry.code_samples.len(),
                    entry.references.len()
                );
            }
        }
        None => {
            if collections.is_empty() {
                println!("No collections found");
                return Ok(());
            }

            for collection in &collections {
                println!("{}  ({} entries)", collection.label, collection.len());
            }
        }
    }

    Ok(())
}

/// Show one entry, searching all collections unless a label is given
async fn show_entry(title: &str, label: Option<String>, full: bool) -> Result<()> {
    let collections = load_corpus().await?;

    let (collection, entry) = match label {
        Some(label) => {
            let collection = collections
                .iter()
                .find(|c| c.label == label)
                .with_context(|| format!("No collection labeled '{label}'"))?;
            (collection, collection.get_entry(title)?)
        }
        None => collections
            .iter()
            .find_map(|c| c.get_entry(title).ok().map(|e| (c, e)))
            .with_context(|| format!("No entry titled '{title}' in any collection"))?,
    };

    println!("Title:      {}", entry.title);
    println!("Collection: {}", collection.label);
    if !entry.tags.is_empty() {
        println!("Tags:       {}", entry.tags.join(", "));
    }
    if let Some(updated) = entry.updated {
        println!("Updated:    {updated}");
    }
    println!();

    if full {
        println!("{}", entry.body.trim_end());
    } else {
        const PREVIEW_LINES: usize = 10;
        let lines: Vec<&str> = entry.body.lines().collect();
        for line in lines.iter().take(PREVIEW_LINES) {
            println!("{line}");
        }
        if lines.len() > PREVIEW_LINES {
            println!("... ({} more lines, use --full)", lines.len() - PREVIEW_LINES);
        }
    }

    if !entry.references.is_empty() {
        println!();
        println!("References:");
        for reference in &entry.references {
            println!("  {} - {}", reference.label, reference.url);
        }
    }

    Ok(())
}

/// Search every collection
async fn search_corpus(query: &str) -> Result<()> {
    let collections = load_corpus().await?;

    let mut total = 0;
    for collection in &collections {
        let hits = collection.search(query);
        if hits.is_empty() {
            continue;
        }

        println!("{}:", collection.label);
        for entry in hits {
            println!("  {}", entry.title);
            total += 1;
        }
    }

    if total == 0 {
        println!("No entries match '{query}'");
    }

    Ok(())
}

/// Probe every reference URL and fail on broken links
async fn check_links(timeout_seconds: Option<u64>) -> Result<()> {
    let cfg = config::config()?;
    let collections = load_corpus().await?;

    let mut settings = cfg.linkcheck.clone();
    if let Some(timeout) = timeout_seconds {
        settings.timeout_seconds = timeout;
    }

    let probe = HttpProbe::new(&settings)?;
    let report = linkcheck::check_links(&collections, &probe).await;

    for result in &report.results {
        println!("{}  {}", result.status, result.url);
        if !result.status.is_ok() {
            for citer in &result.cited_by {
                println!("    cited by {citer}");
            }
        }
    }

    if report.is_clean() {
        println!("All {} links ok", report.results.len());
        Ok(())
    } else {
        anyhow::bail!("{} broken link(s)", report.broken_count())
    }
}

/// Watch the notes directory and rebuild on change
async fn watch_notes() -> Result<()> {
    let cfg = config::config()?;

    // Initial build so the output starts fresh
    build_site(None, true).await?;

    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(16);
    let watcher = NoteWatcher::spawn(WatchConfig::new(&cfg.notes), event_tx);

    println!("Watching {} (Ctrl-C to stop)", cfg.notes.display());

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => {
                        info!("{} note file(s) changed, rebuilding", event.paths.len());
                        if let Err(e) = build_site(None, true).await {
                            tracing::error!("Rebuild failed: {e:#}");
                        }
                    }
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Stopping...");
                break;
            }
        }
    }

    watcher.stop().await
}

/// Print the resolved configuration
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("home:    {}", cfg.home.display());
    println!("notes:   {}", cfg.notes.display());
    println!("output:  {}", cfg.output.display());
    match &cfg.config_file {
        Some(path) => println!("config:  {}", path.display()),
        None => println!("config:  (defaults)"),
    }
    println!("formats: markdown={} html={}", cfg.formats.markdown, cfg.formats.html);
    println!(
        "linkcheck: timeout={}s user-agent={}",
        cfg.linkcheck.timeout_seconds, cfg.linkcheck.user_agent
    );
    if !cfg.ignore.is_empty() {
        println!("ignore:  {}", cfg.ignore.join(", "));
    }

    Ok(())
}
