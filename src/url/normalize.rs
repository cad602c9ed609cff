use url::Url;

/// Normalizes a URL into the form used for deduplication and dispatch
///
/// Two URLs that normalize identically are the same page for the crawl: the
/// second one is never enqueued, and the normalized form is also what gets
/// fetched.
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything after `#`); a fragment addresses a
///    sub-resource of the page, not a distinct page
/// 2. Remove a single trailing slash from non-root paths, so `/page` and
///    `/page/` collapse; the root path `/` is kept as-is
///
/// Queries are deliberately preserved: `?a=1` and `?a=2` are distinct
/// pages, and query admission is the scope filter's decision.
///
/// # Examples
///
/// ```
/// use sitemapper::url::normalize_url;
/// use url::Url;
///
/// let a = Url::parse("http://example.com/page#section").unwrap();
/// let b = Url::parse("http://example.com/page/").unwrap();
/// assert_eq!(normalize_url(&a), normalize_url(&b));
/// ```
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();

    // Step 1: Remove fragment
    normalized.set_fragment(None);

    // Step 2: Collapse trailing slash on non-root paths
    let path = normalized.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            normalized.set_path("/");
        } else {
            normalized.set_path(&trimmed);
        }
    }

    normalized
}
