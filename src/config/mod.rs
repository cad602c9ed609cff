//! Configuration module for Sitemapper
//!
//! Crawls are configured entirely through values passed into the crawl
//! entry point; there is no ambient or process-wide configuration state.
//!
//! # Example
//!
//! ```
//! use sitemapper::config::{validate_seed_url, SearchConfig};
//!
//! let seed = validate_seed_url("https://example.com/").unwrap();
//! let scope = SearchConfig::default();
//! assert_eq!(seed.host_str(), Some("example.com"));
//! assert!(!scope.include_subdomains);
//! ```

mod types;
mod validation;

// Re-export types
pub use types::{CrawlerConfig, SearchConfig};

// Re-export validation functions
pub use validation::validate_seed_url;
