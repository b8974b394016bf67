//! HTTP fetcher for JSON prefix documents and plain CIDR lists.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::aggregator::AddressSet;
use crate::config::Config;
use crate::error::FeedError;
use crate::sources::{SourceDescriptor, SourceFormat};
use crate::utils::format_count;

/// Outcome of fetching one source
#[derive(Debug)]
pub struct FetchResult {
    pub name: String,
    pub entries: AddressSet,
    /// Set when the source failed and contributed nothing
    pub error: Option<String>,
}

impl FetchResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher using the configured user agent and request timeout
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch one source with the parser matching its format.
    ///
    /// Never fails: errors are logged and reported as an empty contribution.
    pub async fn fetch_source(&self, source: &SourceDescriptor) -> FetchResult {
        self.fetch(&source.name, &source.url, source.format).await
    }

    /// Fetch a `{"prefixes": [{"ipv4Prefix": ...}]}` document, empty set on failure
    pub async fn fetch_json_prefixes(&self, name: &str, url: &str) -> AddressSet {
        self.fetch(name, url, SourceFormat::Json).await.entries
    }

    /// Fetch a one-entry-per-line list, empty set on failure
    pub async fn fetch_text_cidrs(&self, name: &str, url: &str) -> AddressSet {
        self.fetch(name, url, SourceFormat::Text).await.entries
    }

    async fn fetch(&self, name: &str, url: &str, format: SourceFormat) -> FetchResult {
        info!("Fetching [{}] {}...", format, name);

        let outcome = match format {
            SourceFormat::Json => self.try_fetch_json(url).await,
            SourceFormat::Text => self.try_fetch_text(url).await,
        };

        match outcome {
            Ok(entries) => {
                info!("[OK] {} - {} entries", name, format_count(entries.len()));
                FetchResult {
                    name: name.to_string(),
                    entries,
                    error: None,
                }
            }
            Err(e) => {
                error!("[FAIL] {} - {}", name, e);
                FetchResult {
                    name: name.to_string(),
                    entries: AddressSet::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn try_fetch_json(&self, url: &str) -> Result<AddressSet, FeedError> {
        let body = get_text(&self.client, url).await?;
        parse_prefix_json(&body)
    }

    async fn try_fetch_text(&self, url: &str) -> Result<AddressSet, FeedError> {
        let body = get_text(&self.client, url).await?;
        Ok(parse_cidr_text(&body))
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

/// GET `url` and return the body. Any non-2xx status is an error.
pub(crate) async fn get_text(client: &Client, url: &str) -> Result<String, FeedError> {
    debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| FeedError::from_reqwest(url, e))?;

    response
        .text()
        .await
        .map_err(|e| FeedError::from_reqwest(url, e))
}

/// Parse a crawler range document, keeping every `ipv4Prefix` verbatim.
///
/// `prefixes` elements without a string `ipv4Prefix` (IPv6 entries, stray
/// strings) are skipped, as is a `prefixes` field that is not a list.
pub fn parse_prefix_json(content: &str) -> Result<AddressSet, FeedError> {
    let doc: Value = serde_json::from_str(content).map_err(|e| FeedError::Parse(e.to_string()))?;

    let Some(prefixes) = doc.get("prefixes").and_then(Value::as_array) else {
        return Ok(AddressSet::new());
    };

    Ok(prefixes
        .iter()
        .filter_map(|p| p.get("ipv4Prefix").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

/// Line boundaries of Python's `str.splitlines`; `\r\n` yields an empty line in between.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Parse a plain list: one entry per line, blank lines and `#` comments skipped
pub fn parse_cidr_text(content: &str) -> AddressSet {
    content
        .split(LINE_BREAKS)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
