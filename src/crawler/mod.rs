//! Crawler module for concurrent site traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with streaming response bodies
//! - The frontier queue with its visited-set deduplication
//! - Coordination of the bounded worker pool
//! - The result stream handed back to the caller

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{Crawler, SearchResult, SearchResults, DEFAULT_CONCURRENCY};
pub use fetcher::{build_http_client, fetch_page, FetchedPage};
pub use frontier::{Frontier, FrontierEntry};
