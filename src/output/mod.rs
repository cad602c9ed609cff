//! Output module for sitemap files and crawl summaries
//!
//! This module handles:
//! - Serializing accepted URLs as XML or plain text sitemaps
//! - Mapping crawl depth to sitemap priority
//! - Recording crawl statistics for the end-of-run summary

mod sitemap;
mod stats;

pub use sitemap::{priority_for_hops, ChangeFreq, OutputFormat, UrlEntry, UrlSet};
pub use stats::CrawlStats;
