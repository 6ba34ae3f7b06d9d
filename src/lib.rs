//! noted - developer-notes corpus tool
//!
//! Loads a tree of markdown notes grouped by year, and renders them into
//! static pages.
//!
//! # Architecture
//!
//! The corpus is a plain in-memory model:
//! - Notes are parsed into topic entries (prose, code samples, references)
//! - Entries live in labeled collections, unique by title, insertion-ordered
//! - Renderers are pure formatters: same corpus, byte-identical pages
//!
//! # Modules
//!
//! - `corpus`: Data structures (TopicEntry, TopicCollection)
//! - `loader`: Note-file parsing and corpus loading
//! - `render`: Markdown and HTML page renderers
//! - `site`: Build driver and incremental-build manifest
//! - `linkcheck`: Reference URL checking
//! - `watch`: Rebuild-on-change watcher
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Render the corpus
//! noted build
//!
//! # Browse it
//! noted list --label 2021
//! noted show "Late Binding Closures"
//!
//! # Keep the output current while editing
//! noted watch
//! ```

pub mod cli;
pub mod config;
pub mod corpus;
pub mod linkcheck;
pub mod loader;
pub mod render;
pub mod site;
pub mod watch;

// Re-export main types at crate root for convenience
pub use corpus::{CodeSample, CorpusError, Reference, TopicCollection, TopicEntry};
pub use loader::NoteLoader;
pub use render::{HtmlRenderer, MarkdownRenderer, OutputFormat, Renderer};
pub use site::{BuildManifest, SiteBuilder};
