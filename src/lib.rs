//! Sitemapper: a concurrent website-to-sitemap crawler
//!
//! This crate implements a breadth-first crawler that discovers every
//! internally-reachable page of a single site, starting from one seed URL,
//! and streams the discovered pages (with crawl depth) to the caller for
//! sitemap construction.

pub mod config;
pub mod crawler;
pub mod links;
pub mod output;
pub mod url;

use thiserror::Error;

/// Errors that prevent a crawl from starting
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

/// Errors raised while validating caller-supplied input
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid seed URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("seed URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("seed URL has no host")]
    MissingHost,

    #[error("output file must end in .xml or .txt, got {0:?}")]
    UnsupportedOutput(String),
}

/// Per-URL errors reported on the result stream
///
/// These never abort a crawl; each one is attached to the `SearchResult`
/// for the URL it occurred on and traversal continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to read response body: {0}")]
    Body(std::io::Error),
}

/// Fatal conditions raised by the link extractor
///
/// Per-element problems (malformed or empty anchors) are skipped silently;
/// only a failure of the underlying byte stream ends an extraction early.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),
}

impl From<ExtractError> for FetchError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Read(e) => FetchError::Body(e),
        }
    }
}

/// Result type alias for crawl setup operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration validation
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{validate_seed_url, CrawlerConfig, SearchConfig};
pub use crawler::{Crawler, SearchResult, SearchResults};
pub use links::{extract_links, Link, LinkStream};
pub use output::{priority_for_hops, ChangeFreq, CrawlStats, OutputFormat, UrlEntry, UrlSet};
pub use url::{in_scope, normalize_url};
