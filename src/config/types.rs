use std::time::Duration;

/// Scope policy for a crawl
///
/// Decides which discovered hosts count as part of the seed's site. All
/// three toggles default to off, which restricts the crawl to the exact
/// seed host with no query-string URLs.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Treat hosts that differ only in their final dot-separated label as
    /// the same site (`site.com` and `site.org` compare equal)
    pub ignore_top_level_domain: bool,

    /// Follow links whose URL carries a non-empty query string
    pub include_links_with_query: bool,

    /// Follow links to subdomains of the seed host
    pub include_subdomains: bool,
}

/// Engine tuning for a crawl
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch workers; 0 selects the built-in default,
    /// never an unlimited pool
    pub concurrency: usize,

    /// Total per-request timeout, from connect through end of body
    pub fetch_timeout: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            concurrency: 0,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}
