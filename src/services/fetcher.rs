use crate::error::{Result, SplitterError};
use crate::types::{DocumentMetadata, SourceType};
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;

/// Upper bound on simultaneous downloads when following a link list.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 6;

static MARKDOWN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]\((https?://[^)\s]+)\)").unwrap());
static BARE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());

pub struct ContentFetcher;

impl ContentFetcher {
    pub async fn fetch_content(source: &str) -> Result<(String, DocumentMetadata)> {
        if Self::is_url(source) {
            Self::fetch_from_url(source).await
        } else {
            Self::fetch_from_file(source).await
        }
    }

    async fn fetch_from_url(url: &str) -> Result<(String, DocumentMetadata)> {
        info!("Fetching {}", url);

        Url::parse(url)?;
        let response = reqwest::get(url).await?;

        if !response.status().is_success() {
            return Err(SplitterError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let content = response.text().await?;
        let metadata = Self::metadata(url, SourceType::Url, &content);

        Ok((content, metadata))
    }

    async fn fetch_from_file(file_path: &str) -> Result<(String, DocumentMetadata)> {
        info!("Reading file: {}", file_path);

        let path = Path::new(file_path);
        if !path.is_file() {
            return Err(SplitterError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let content = fs::read_to_string(path).await?;
        let metadata = Self::metadata(file_path, SourceType::LocalFile, &content);

        Ok((content, metadata))
    }

    fn metadata(source: &str, source_type: SourceType, content: &str) -> DocumentMetadata {
        DocumentMetadata {
            source: source.to_string(),
            source_type,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            total_lines: content.lines().count(),
        }
    }

    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    /// Host of a URL input, with a non-default port appended, used to name its
    /// output directory and index.
    pub fn host_of(source: &str) -> Option<String> {
        let parsed = Url::parse(source).ok()?;
        let host = parsed.host_str()?;
        Some(match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Pulls page URLs out of a link list.
    ///
    /// Accepts markdown links (`- [Intro](https://...)`) and lines holding a
    /// bare http(s) URL. Duplicates are dropped; first-seen order is kept.
    pub fn extract_links(text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for line in text.lines() {
            let trimmed = line.trim();
            let found: Vec<&str> = if BARE_URL_RE.is_match(trimmed) {
                vec![trimmed]
            } else {
                MARKDOWN_LINK_RE
                    .captures_iter(trimmed)
                    .filter_map(|c| c.get(1).map(|m| m.as_str()))
                    .collect()
            };

            for link in found {
                if seen.insert(link.to_string()) {
                    links.push(link.to_string());
                }
            }
        }

        links
    }

    /// Downloads every URL with at most `concurrency` requests in flight.
    ///
    /// Failed downloads are logged and left out. Results keep the input order.
    pub async fn fetch_many(urls: &[String], concurrency: usize) -> Vec<(String, String)> {
        let total = urls.len();
        let mut fetched: Vec<(usize, String, String)> = stream::iter(urls.iter().cloned().enumerate())
            .map(|(index, url)| async move {
                match Self::fetch_from_url(&url).await {
                    Ok((content, _)) => {
                        debug!("Fetched {}/{}: {}", index + 1, total, url);
                        Some((index, url, content))
                    }
                    Err(e) => {
                        warn!("Skipping {}: {}", url, e);
                        None
                    }
                }
            })
            .buffer_unordered(concurrency.max(1))
            .filter_map(|result| async move { result })
            .collect()
            .await;

        fetched.sort_by_key(|(index, _, _)| *index);
        fetched.into_iter().map(|(_, url, content)| (url, content)).collect()
    }
}
