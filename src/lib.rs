//! # feedwaf - WAF IP list aggregator
//!
//! Pulls IP/CIDR lists from search-engine crawler range documents,
//! threat-intelligence feeds and a daily malicious-IP listing, and writes two
//! deduplicated, sorted text files: a white list (crawlers to exempt) and a
//! black list (addresses to block). Every run re-fetches everything and
//! overwrites both files.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (clap)                                                 │
//! │    └── Commands: update (default), sources, default-config  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Source registry, timeouts, output paths              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    ├── JSON prefix documents (Google, Bing, Apple)          │
//! │    └── Plain CIDR lists (Chaitin Rivers shares)             │
//! │  Daily scraper (reqwest + scraper + chrono)                 │
//! │    └── Last N days of an HTML table listing                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    └── Per-list union, exact-text deduplication             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Writer (tempfile)                                          │
//! │    └── Sorted, newline-terminated, atomic overwrite         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use feedwaf::aggregator::collect;
//! use feedwaf::config::Config;
//! use feedwaf::fetcher::Fetcher;
//! use feedwaf::sources::ListKind;
//! use feedwaf::writer::save_list;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let fetcher = Fetcher::new(&config)?;
//!
//!     let white = collect(&fetcher, &config.sources, ListKind::White).await;
//!     save_list(&config.output.white, &white.entries)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Per-list merging and source reports
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`daily`] - Daily HTML listing scraper
//! - [`error`] - Error types
//! - [`fetcher`] - HTTP client for JSON and text lists
//! - [`sources`] - Source registry
//! - [`utils`] - Formatting helpers
//! - [`writer`] - List file output

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod daily;
pub mod error;
pub mod fetcher;
pub mod sources;
pub mod utils;
pub mod writer;

pub use config::Config;
pub use error::FeedError;
