//! Standalone HTML page renderer.
//!
//! Bodies are formatted with a small line-based pass: fenced code blocks,
//! headings, bullet lists, and paragraphs. Everything interpolated into the
//! page is escaped.

use crate::corpus::{TopicCollection, TopicEntry};

use super::{escape_html, OutputFormat, Renderer};

/// Renders collections as self-contained HTML pages
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn render_collection(&self, collection: &TopicCollection) -> String {
        let title = format!("Notes {}", collection.label);
        let mut body = String::new();

        body.push_str(&format!("<h1>{}</h1>\n", escape_html(&title)));

        for entry in collection.entries() {
            body.push_str(&render_entry(entry));
        }

        page_shell(&title, &body)
    }

    fn render_index(&self, collections: &[TopicCollection]) -> String {
        let mut body = String::new();
        body.push_str("<h1>Notes</h1>\n<ul>\n");

        for collection in collections {
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a> ({} entries)</li>\n",
                escape_html(&self.file_name(&collection.label)),
                escape_html(&collection.label),
                collection.len()
            ));
        }

        body.push_str("</ul>\n");
        page_shell("Notes", &body)
    }
}

/// Wrap rendered body content in a minimal document shell
fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

fn render_entry(entry: &TopicEntry) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "<section id=\"{}\">\n<h2>{}</h2>\n",
        escape_html(&entry.slug()),
        escape_html(&entry.title)
    ));

    if !entry.tags.is_empty() {
        out.push_str(&format!(
            "<p class=\"tags\"><em>Tags: {}</em></p>\n",
            escape_html(&entry.tags.join(", "))
        ));
    }
    if let Some(updated) = entry.updated {
        out.push_str(&format!("<p class=\"updated\"><em>Updated: {updated}</em></p>\n"));
    }

    out.push_str(&render_body(&entry.body));

    if !entry.references.is_empty() {
        out.push_str("<h3>References</h3>\n<ul>\n");
        for reference in &entry.references {
            out.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                escape_html(&reference.url),
                escape_html(&reference.label)
            ));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</section>\n");
    out
}

/// Line-based body formatter: fences, headings, bullets, paragraphs
fn render_body(body: &str) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list: Vec<&str> = Vec::new();
    let mut fence: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some((language, mut lines)) = fence.take() {
            if line.trim_start().starts_with("```") {
                out.push_str(&format!(
                    "<pre><code class=\"language-{}\">{}</code></pre>\n",
                    escape_html(&language),
                    escape_html(&lines.join("\n"))
                ));
            } else {
                lines.push(line);
                fence = Some((language, lines));
            }
            continue;
        }

        let trimmed = line.trim_start();

        if let Some(tag) = trimmed.strip_prefix("```") {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list);
            let language = if tag.trim().is_empty() { "text" } else { tag.trim() };
            fence = Some((language.to_string(), Vec::new()));
        } else if let Some(rest) = heading(trimmed) {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list);
            let (level, text) = rest;
            // Body headings nest under the entry's <h2>
            let level = (level + 2).min(6);
            out.push_str(&format!("<h{level}>{}</h{level}>\n", escape_html(text)));
        } else if let Some(item) = trimmed.strip_prefix("- ") {
            flush_paragraph(&mut out, &mut paragraph);
            list.push(item);
        } else if trimmed.is_empty() {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list);
        } else {
            flush_list(&mut out, &mut list);
            paragraph.push(trimmed);
        }
    }

    // An unterminated fence renders as a code block rather than vanishing
    if let Some((language, lines)) = fence {
        out.push_str(&format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            escape_html(&language),
            escape_html(&lines.join("\n"))
        ));
    }
    flush_paragraph(&mut out, &mut paragraph);
    flush_list(&mut out, &mut list);

    out
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 4 {
        return None;
    }
    line[hashes..]
        .strip_prefix(' ')
        .map(|text| (hashes, text.trim()))
}

fn flush_paragraph(out: &mut String, paragraph: &mut Vec<&str>) {
    if !paragraph.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", escape_html(&paragraph.join(" "))));
        paragraph.clear();
    }
}

fn flush_list(out: &mut String, list: &mut Vec<&str>) {
    if !list.is_empty() {
        out.push_str("<ul>\n");
        for item in list.iter() {
            out.push_str(&format!("<li>{}</li>\n", escape_html(item)));
        }
        out.push_str("</ul>\n");
        list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Reference, TopicEntry};

    #[test]
    fn test_body_blocks() {
        let html = render_body(
            "Intro paragraph\nstill the same paragraph.\n\n## Flow\n\n- first\n- second\n\n```python\nprint('hi')\n```\n",
        );

        assert!(html.contains("<p>Intro paragraph still the same paragraph.</p>"));
        assert!(html.contains("<h4>Flow</h4>"));
        assert!(html.contains("<li>first</li>"));
        assert!(html.contains("<pre><code class=\"language-python\">print(&#39;hi&#39;)</code></pre>"));
    }

    #[test]
    fn test_untagged_fence_gets_text_language() {
        let html = render_body("```\nGET / HTTP/1.1\n```\n");
        assert!(html.contains("class=\"language-text\""));
    }

    #[test]
    fn test_entry_escapes_interpolated_text() {
        let entry = TopicEntry::new("Tricks & <Traps>", "a < b")
            .unwrap()
            .with_reference(Reference::new("A \"quoted\" label", "https://example.com/?a=1&b=2"));

        let html = render_entry(&entry);
        assert!(html.contains("<h2>Tricks &amp; &lt;Traps&gt;</h2>"));
        assert!(html.contains("<p>a &lt; b</p>"));
        assert!(html.contains("https://example.com/?a=1&amp;b=2"));
        assert!(!html.contains("<Traps>"));
    }

    #[test]
    fn test_collection_page_is_deterministic() {
        let mut collection = TopicCollection::new("2021");
        collection
            .add_entry(TopicEntry::new("Kerberos Module", "Negotiate header dance.").unwrap())
            .unwrap();

        let first = HtmlRenderer.render_collection(&collection);
        let second = HtmlRenderer.render_collection(&collection);
        assert_eq!(first, second);
        assert!(first.starts_with("<!DOCTYPE html>"));
        assert!(first.contains("<section id=\"kerberos-module\">"));
    }
}
