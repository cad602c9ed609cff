//! URL handling module for Sitemapper
//!
//! This module provides the dedup normalization applied to every URL before
//! it enters the frontier, and the pure scope predicate that decides which
//! discovered URLs belong to the seed's site.

mod normalize;
mod scope;

// Re-export main functions
pub use normalize::normalize_url;
pub use scope::in_scope;
