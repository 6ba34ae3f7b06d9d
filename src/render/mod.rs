//! Rendering collections into human-readable pages.
//!
//! Renderers are pure formatters: the output is a function of the
//! collection alone (no clocks, no environment), so rendering the same
//! collection twice produces byte-identical pages. Writing pages to disk
//! is the caller's concern.

pub mod html;
pub mod markdown;

use serde::{Deserialize, Serialize};

use crate::corpus::TopicCollection;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

/// Output format of a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Markdown pages
    Markdown,

    /// Standalone HTML pages
    Html,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

/// Trait for page renderers
pub trait Renderer: Send + Sync {
    /// The format this renderer produces
    fn format(&self) -> OutputFormat;

    /// Output file name for a collection page
    fn file_name(&self, label: &str) -> String {
        format!("{}.{}", label, self.format().extension())
    }

    /// Output file name for the corpus index page
    fn index_file_name(&self) -> String {
        format!("index.{}", self.format().extension())
    }

    /// Render one collection into a page
    fn render_collection(&self, collection: &TopicCollection) -> String;

    /// Render the corpus index linking every collection page
    fn render_index(&self, collections: &[TopicCollection]) -> String;
}

/// Escape text for interpolation into HTML
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(OutputFormat::Markdown.extension(), "md");
        assert_eq!(OutputFormat::Html.extension(), "html");
    }
}
