//! Crawl statistics
//!
//! Running counters accumulated while the result stream is drained,
//! rendered as the one-line summary the CLI prints at the end of a run.

use crate::crawler::SearchResult;
use std::fmt;

/// Running counters for one crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// Results seen so far, successes and failures together
    pub total: u64,

    /// Successfully fetched pages
    pub accepted: u64,

    /// Pages that failed to fetch
    pub failed: u64,

    /// Deepest hop count seen
    pub max_hops: u32,
}

impl CrawlStats {
    /// Folds one result into the counters.
    ///
    /// Only accepted pages advance the depth high-water mark.
    pub fn record(&mut self, result: &SearchResult) {
        self.total += 1;
        if result.is_success() {
            self.accepted += 1;
            if result.hops > self.max_hops {
                self.max_hops = result.hops;
            }
        } else {
            self.failed += 1;
        }
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted | {} errors | {} total links found",
            self.accepted, self.failed, self.total
        )
    }
}
