//! Markdown page renderer.

use crate::corpus::TopicCollection;

use super::{OutputFormat, Renderer};

/// Renders collections as standalone markdown pages.
///
/// Entry bodies are markdown already and pass through untouched (their code
/// fences included); the renderer adds the page frame, per-entry metadata,
/// and the reference lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn render_collection(&self, collection: &TopicCollection) -> String {
        let mut page = String::new();
        page.push_str(&format!("# Notes {}\n", collection.label));

        for entry in collection.entries() {
            page.push('\n');
            page.push_str(&format!("## {}\n\n", entry.title));

            if !entry.tags.is_empty() {
                page.push_str(&format!("*Tags: {}*\n\n", entry.tags.join(", ")));
            }
            if let Some(updated) = entry.updated {
                page.push_str(&format!("*Updated: {updated}*\n\n"));
            }

            let body = entry.body.trim_end();
            if !body.is_empty() {
                page.push_str(body);
                page.push('\n');
            }

            if !entry.references.is_empty() {
                page.push_str("\n### References\n\n");
                for reference in &entry.references {
                    page.push_str(&format!("- [{}]({})\n", reference.label, reference.url));
                }
            }
        }

        page
    }

    fn render_index(&self, collections: &[TopicCollection]) -> String {
        let mut page = String::new();
        page.push_str("# Notes\n\n");
        page.push_str("| Collection | Entries |\n");
        page.push_str("|---|---:|\n");

        for collection in collections {
            page.push_str(&format!(
                "| [{}]({}) | {} |\n",
                escape_cell(&collection.label),
                self.file_name(&collection.label),
                collection.len()
            ));
        }

        page
    }
}

/// Escape `|` so labels cannot break the index table
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
