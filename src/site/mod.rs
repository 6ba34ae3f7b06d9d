//! Site building: turning a loaded corpus into rendered pages.
//!
//! The builder only produces page values; writing them under the output
//! directory is the CLI's job. This keeps the render path free of I/O and
//! byte-for-byte reproducible.

pub mod manifest;

use crate::config::FormatSettings;
use crate::corpus::TopicCollection;
use crate::render::{HtmlRenderer, MarkdownRenderer, Renderer};

pub use manifest::BuildManifest;

/// One rendered output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Path relative to the output directory, e.g. `2021.html`
    pub relative_path: String,

    /// Full page content
    pub content: String,
}

/// Renders a corpus with every configured renderer
pub struct SiteBuilder {
    renderers: Vec<Box<dyn Renderer>>,
}

impl SiteBuilder {
    /// Create a builder with no renderers
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    /// Create a builder from the configured format toggles
    pub fn from_formats(formats: &FormatSettings) -> Self {
        let mut builder = Self::new();
        if formats.markdown {
            builder = builder.with_renderer(Box::new(MarkdownRenderer));
        }
        if formats.html {
            builder = builder.with_renderer(Box::new(HtmlRenderer));
        }
        builder
    }

    /// Add a renderer
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }

    /// Number of configured renderers
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Render the index page and one page per collection, for every
    /// configured format
    pub fn build(&self, collections: &[TopicCollection]) -> Vec<RenderedPage> {
        let mut pages = Vec::new();

        for renderer in &self.renderers {
            pages.push(RenderedPage {
                relative_path: renderer.index_file_name(),
                content: renderer.render_index(collections),
            });

            for collection in collections {
                pages.push(RenderedPage {
                    relative_path: renderer.file_name(&collection.label),
                    content: renderer.render_collection(collection),
                });
            }
        }

        pages
    }
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::from_formats(&FormatSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TopicEntry;

    fn collections() -> Vec<TopicCollection> {
        let mut collection = TopicCollection::new("2021");
        collection
            .add_entry(TopicEntry::new("Kerberos Module", "Negotiate notes.").unwrap())
            .unwrap();
        vec![collection]
    }

    #[test]
    fn test_build_produces_index_and_collection_pages() {
        let builder = SiteBuilder::default();
        let pages = builder.build(&collections());

        let paths: Vec<_> = pages.iter().map(|p| p.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["index.md", "2021.md", "index.html", "2021.html"]);
    }

    #[test]
    fn test_format_toggles() {
        let builder = SiteBuilder::from_formats(&FormatSettings {
            markdown: true,
            html: false,
        });
        assert_eq!(builder.renderer_count(), 1);

        let pages = builder.build(&collections());
        assert!(pages.iter().all(|p| p.relative_path.ends_with(".md")));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = SiteBuilder::default();
        let collections = collections();

        assert_eq!(builder.build(&collections), builder.build(&collections));
    }
}
