//! Configuration management for feedwaf.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::{default_sources, SourceDescriptor};

/// Identifying header sent with every request. Some upstreams reject default client agents.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; FeedMyWafIP/1.0; +https://github.com/)";

/// Placeholder substituted with `YYYY-MM-DD` in the daily listing URL
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User-Agent header for all requests
    pub user_agent: String,

    /// Timeout for JSON and text list requests, in seconds
    pub request_timeout_secs: u64,

    /// Output file paths
    pub output: OutputConfig,

    /// JSON and text list sources
    pub sources: Vec<SourceDescriptor>,

    /// Daily HTML listing scraped for the black list
    pub daily: DailyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
            output: OutputConfig::default(),
            sources: default_sources(),
            daily: DailyConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, built-in defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            anyhow::bail!("user_agent must not be empty");
        }

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        if self.output.white.as_os_str().is_empty() || self.output.black.as_os_str().is_empty() {
            anyhow::bail!("Output paths must not be empty");
        }

        if self.output.white == self.output.black {
            anyhow::bail!(
                "White and black lists must go to different files: {:?}",
                self.output.white
            );
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            if !is_http_url(&source.url) {
                anyhow::bail!(
                    "Source '{}' URL must use http(s): {}",
                    source.name,
                    source.url
                );
            }
            if !names.insert(source.name.as_str()) {
                anyhow::bail!("Duplicate source name '{}'", source.name);
            }
        }

        self.daily.validate()?;

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/config.yaml").to_string()
    }
}

/// Where the merged lists are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub white: PathBuf,
    pub black: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            white: PathBuf::from("spider_white_ips.txt"),
            black: PathBuf::from("bad_black_ips.txt"),
        }
    }
}

/// Daily malicious-IP listing (one HTML page per day)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyConfig {
    pub enabled: bool,

    /// Display name used in logs
    pub name: String,

    /// Page URL, `{date}` replaced by `YYYY-MM-DD`
    pub url_template: String,

    /// Number of most recent days to scrape, today included
    pub days: u32,

    pub timeout_secs: u64,

    /// The listing site serves an invalid certificate
    pub accept_invalid_certs: bool,
}

impl Default for DailyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "BadIP".to_string(),
            url_template: "https://www.badip.com/d-{date}.html".to_string(),
            days: 7,
            timeout_secs: 20,
            accept_invalid_certs: true,
        }
    }
}

impl DailyConfig {
    fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if !is_http_url(&self.url_template) {
            anyhow::bail!(
                "Daily source URL must use http(s): {}",
                self.url_template
            );
        }

        if !self.url_template.contains(DATE_PLACEHOLDER) {
            anyhow::bail!(
                "Daily source URL must contain '{}': {}",
                DATE_PLACEHOLDER,
                self.url_template
            );
        }

        if self.timeout_secs == 0 {
            anyhow::bail!("daily.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}
