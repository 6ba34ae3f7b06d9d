//! Reference link checking.
//!
//! Collects every reference URL in the corpus (deduplicated, sorted) and
//! probes each one. Probing sits behind the [`UrlProbe`] trait so tests can
//! substitute a stub for the HTTP client.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::LinkcheckSettings;
use crate::corpus::TopicCollection;

/// Outcome of probing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// The server answered with a success status
    Ok { code: u16 },

    /// The server answered with a non-success status
    Broken { code: u16 },

    /// No HTTP response at all (DNS failure, refused, timeout)
    Unreachable { reason: String },
}

impl LinkStatus {
    /// Whether the link resolved cleanly
    pub fn is_ok(&self) -> bool {
        matches!(self, LinkStatus::Ok { .. })
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Ok { code } => write!(f, "ok ({code})"),
            LinkStatus::Broken { code } => write!(f, "broken ({code})"),
            LinkStatus::Unreachable { reason } => write!(f, "unreachable: {reason}"),
        }
    }
}

/// Trait for URL probes
#[async_trait]
pub trait UrlProbe: Send + Sync {
    /// Human-readable probe name
    fn name(&self) -> &str;

    /// Probe a single URL
    async fn probe(&self, url: &str) -> LinkStatus;
}

/// HTTP probe: HEAD first, GET when the server rejects HEAD
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Build a probe from the configured linkcheck settings
    pub fn new(settings: &LinkcheckSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProbe for HttpProbe {
    fn name(&self) -> &str {
        "http"
    }

    async fn probe(&self, url: &str) -> LinkStatus {
        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(e) => {
                return LinkStatus::Unreachable {
                    reason: e.to_string(),
                }
            }
        };

        let mut status = response.status();

        // Some servers reject HEAD outright; retry those with GET
        if status == reqwest::StatusCode::METHOD_NOT_ALLOWED {
            debug!("HEAD not allowed for {}, retrying with GET", url);
            match self.client.get(url).send().await {
                Ok(response) => status = response.status(),
                Err(e) => {
                    return LinkStatus::Unreachable {
                        reason: e.to_string(),
                    }
                }
            }
        }

        if status.is_success() {
            LinkStatus::Ok {
                code: status.as_u16(),
            }
        } else {
            LinkStatus::Broken {
                code: status.as_u16(),
            }
        }
    }
}

/// Result of checking one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
    /// The URL probed
    pub url: String,

    /// Probe outcome
    pub status: LinkStatus,

    /// Entries citing this URL, as `<label> / <title>`
    pub cited_by: Vec<String>,
}

/// Outcome of a full corpus link check
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    /// Per-URL results, sorted by URL
    pub results: Vec<LinkResult>,
}

impl LinkReport {
    /// Number of URLs that did not resolve cleanly
    pub fn broken_count(&self) -> usize {
        self.results.iter().filter(|r| !r.status.is_ok()).count()
    }

    /// Whether every URL resolved cleanly
    pub fn is_clean(&self) -> bool {
        self.broken_count() == 0
    }
}

/// Collect every reference URL with its citing entries, deduplicated by URL
/// and sorted for a stable report order
pub fn collect_urls(collections: &[TopicCollection]) -> Vec<(String, Vec<String>)> {
    let mut cited: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for collection in collections {
        for entry in collection.entries() {
            for reference in &entry.references {
                cited
                    .entry(reference.url.clone())
                    .or_default()
                    .push(format!("{} / {}", collection.label, entry.title));
            }
        }
    }

    cited.into_iter().collect()
}

/// Probe every reference URL in the corpus
pub async fn check_links(collections: &[TopicCollection], probe: &dyn UrlProbe) -> LinkReport {
    let urls = collect_urls(collections);
    info!("Checking {} unique reference URLs via {}", urls.len(), probe.name());

    let mut results = Vec::with_capacity(urls.len());
    for (url, cited_by) in urls {
        let status = probe.probe(&url).await;
        if !status.is_ok() {
            warn!("{}: {}", url, status);
        }
        results.push(LinkResult {
            url,
            status,
            cited_by,
        });
    }

    LinkReport { results }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Reference, TopicEntry};

    struct StubProbe {
        statuses: BTreeMap<String, LinkStatus>,
    }

    #[async_trait]
    impl UrlProbe for StubProbe {
        fn name(&self) -> &str {
            "stub"
        }

        async fn probe(&self, url: &str) -> LinkStatus {
            self.statuses
                .get(url)
                .cloned()
                .unwrap_or(LinkStatus::Unreachable {
                    reason: "no stub".to_string(),
                })
        }
    }

    fn corpus() -> Vec<TopicCollection> {
        let mut collection = TopicCollection::new("2021");
        collection
            .add_entry(
                TopicEntry::new("Kerberos Module", "")
                    .unwrap()
                    .with_reference(Reference::new("RFC 4559", "https://example.com/rfc4559"))
                    .with_reference(Reference::new("Guide", "https://example.com/guide")),
            )
            .unwrap();
        collection
            .add_entry(
                TopicEntry::new("Late Binding Closures", "")
                    .unwrap()
                    .with_reference(Reference::new("Guide again", "https://example.com/guide")),
            )
            .unwrap();
        vec![collection]
    }

    #[test]
    fn test_collect_urls_dedups_and_sorts() {
        let urls = collect_urls(&corpus());

        assert_eq!(urls.len(), 2);
        assert_eq!(urls[0].0, "https://example.com/guide");
        assert_eq!(
            urls[0].1,
            vec![
                "2021 / Kerberos Module".to_string(),
                "2021 / Late Binding Closures".to_string()
            ]
        );
        assert_eq!(urls[1].0, "https://example.com/rfc4559");
    }

    #[tokio::test]
    async fn test_check_links_reports_broken() {
        let probe = StubProbe {
            statuses: [
                ("https://example.com/guide".to_string(), LinkStatus::Ok { code: 200 }),
                (
                    "https://example.com/rfc4559".to_string(),
                    LinkStatus::Broken { code: 404 },
                ),
            ]
            .into_iter()
            .collect(),
        };

        let report = check_links(&corpus(), &probe).await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.broken_count(), 1);
        assert!(!report.is_clean());
        assert_eq!(report.results[1].status, LinkStatus::Broken { code: 404 });
    }

    #[tokio::test]
    async fn test_clean_report() {
        let probe = StubProbe {
            statuses: [
                ("https://example.com/guide".to_string(), LinkStatus::Ok { code: 200 }),
                ("https://example.com/rfc4559".to_string(), LinkStatus::Ok { code: 200 }),
            ]
            .into_iter()
            .collect(),
        };

        let report = check_links(&corpus(), &probe).await;
        assert!(report.is_clean());
    }
}
