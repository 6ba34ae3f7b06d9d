//! Parsing a single note file into a topic entry.
//!
//! Note files are markdown with optional YAML front matter:
//!
//! ```text
//! ---
//! title: Kerberos Module
//! tags: [http, auth]
//! updated: 2021-09-14
//! references:
//!   - label: RFC 4559
//!     url: https://www.rfc-editor.org/rfc/rfc4559
//! ---
//! The client starts with a plain request...
//! ```
//!
//! When front matter omits `title`, the first `# ` heading wins, then the
//! file stem.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::corpus::{CodeSample, Reference, TopicEntry};

/// Front matter schema (matches the YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    updated: Option<NaiveDate>,
    #[serde(default)]
    references: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReferenceEntry {
    label: String,
    url: String,
}

/// Parse the text of one note file.
///
/// `stem` is the file name without extension, used as the last-resort title.
pub fn parse_note(text: &str, stem: &str) -> Result<TopicEntry> {
    let (front_matter, body) = split_front_matter(text)?;

    let title = front_matter
        .title
        .clone()
        .or_else(|| first_heading(body))
        .unwrap_or_else(|| stem.to_string());

    let mut entry = TopicEntry::new(title, body)?;
    entry.tags = front_matter.tags;
    entry.updated = front_matter.updated;
    entry.references = front_matter
        .references
        .into_iter()
        .map(|r| Reference::new(r.label, r.url))
        .collect();
    entry.code_samples = extract_code_samples(&entry.body);

    Ok(entry)
}

/// Split off the YAML front matter, if any, and return it with the body
fn split_front_matter(text: &str) -> Result<(FrontMatter, &str)> {
    let Some(rest) = text.strip_prefix("---\n").or_else(|| text.strip_prefix("---\r\n")) else {
        return Ok((FrontMatter::default(), text));
    };

    for (idx, _) in rest.match_indices("\n---") {
        let after = &rest[idx + 4..];
        let body = if after.is_empty() {
            ""
        } else if let Some(body) = after.strip_prefix('\n') {
            body
        } else if let Some(body) = after.strip_prefix("\r\n") {
            body
        } else {
            // Not a fence, e.g. a "----" rule inside the YAML
            continue;
        };

        let front_matter: FrontMatter =
            serde_yaml::from_str(&rest[..idx]).context("Failed to parse note front matter")?;
        return Ok((front_matter, body));
    }

    // No closing fence: the whole file is body
    Ok((FrontMatter::default(), text))
}

/// First `# ` heading in the body, without the marker
fn first_heading(body: &str) -> Option<String> {
    body.lines().find_map(|line| {
        line.trim_start()
            .strip_prefix("# ")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

/// Lift fenced code blocks out of a markdown body, in document order
pub fn extract_code_samples(body: &str) -> Vec<CodeSample> {
    let mut samples = Vec::new();
    let mut fence: Option<(String, Vec<&str>)> = None;

    for line in body.lines() {
        if let Some((language, mut lines)) = fence.take() {
            if line.trim_start().starts_with("```") {
                samples.push(CodeSample::new(language, lines.join("\n")));
            } else {
                lines.push(line);
                fence = Some((language, lines));
            }
            continue;
        }

        if let Some(tag) = line.trim_start().strip_prefix("```") {
            let language = if tag.trim().is_empty() { "text" } else { tag.trim() };
            fence = Some((language.to_string(), Vec::new()));
        }
    }

    // Unterminated fence still counts as a sample
    if let Some((language, lines)) = fence {
        samples.push(CodeSample::new(language, lines.join("\n")));
    }

    samples
}
