//! Error types for feedwaf.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No table found in page")]
    MissingTable,

    #[error("File system error on {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// Classify a reqwest failure, keeping status codes distinct from transport errors.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            },
            None => FeedError::Network {
                url: url.to_string(),
                source: err,
            },
        }
    }
}
