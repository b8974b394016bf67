//! Source registry: which upstream lists feed which output list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output list a source contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Legitimate crawlers, exempted from blocking
    White,
    /// Malicious addresses, intended for blocking
    Black,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::White => write!(f, "white"),
            ListKind::Black => write!(f, "black"),
        }
    }
}

/// Response shape of a source, which selects the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `{"prefixes": [{"ipv4Prefix": "..."}]}` documents
    Json,
    /// One IP/CIDR per line, `#` comments
    Text,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Json => write!(f, "JSON"),
            SourceFormat::Text => write!(f, "TEXT"),
        }
    }
}

/// A single upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    pub list: ListKind,
    pub format: SourceFormat,
}

impl SourceDescriptor {
    pub fn new(name: &str, url: &str, list: ListKind, format: SourceFormat) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            list,
            format,
        }
    }
}

/// Sources for one list, JSON sources first, registry order kept within each format.
pub fn sources_for(sources: &[SourceDescriptor], list: ListKind) -> Vec<&SourceDescriptor> {
    let mut selected: Vec<&SourceDescriptor> = sources.iter().filter(|s| s.list == list).collect();
    // Stable sort keeps the configured order inside each format group.
    selected.sort_by_key(|s| match s.format {
        SourceFormat::Json => 0,
        SourceFormat::Text => 1,
    });
    selected
}

const CHAITIN_SHARE: &str = "https://ip-22617.rivers.chaitin.cn/api/share/ip_group";

/// Built-in registry of list sources.
pub fn default_sources() -> Vec<SourceDescriptor> {
    use ListKind::{Black, White};
    use SourceFormat::{Json, Text};

    vec![
        // Search engine crawlers
        SourceDescriptor::new(
            "Bing",
            "https://www.bing.com/toolbox/bingbot.json",
            White,
            Json,
        ),
        SourceDescriptor::new(
            "Apple",
            "https://search.developer.apple.com/applebot.json",
            White,
            Json,
        ),
        SourceDescriptor::new(
            "Google",
            "https://developers.google.com/static/search/apis/ipranges/googlebot.json",
            White,
            Json,
        ),
        SourceDescriptor::new(
            "Baidu",
            &format!("{CHAITIN_SHARE}/74a45de2d0f04f739ca73b2ecc05930d?format=cidr"),
            White,
            Text,
        ),
        // Threat intelligence
        SourceDescriptor::new(
            "MaliciousOps",
            &format!("{CHAITIN_SHARE}/9c1a54395c174e94af2b704eda610d95?format=cidr"),
            Black,
            Text,
        ),
        SourceDescriptor::new(
            "ThreatIntel",
            &format!("{CHAITIN_SHARE}/d13d2a3f9bb34fc4b2c846e3e0bc03bc?format=cidr"),
            Black,
            Text,
        ),
        SourceDescriptor::new(
            "ScannersAttacks",
            &format!("{CHAITIN_SHARE}/0ae14d75480842899342104743d2fc56?format=cidr"),
            Black,
            Text,
        ),
    ]
}
