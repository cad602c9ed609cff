use crate::config::SearchConfig;
use url::{Host, Url};

/// Decides whether a discovered URL belongs to the seed's site
///
/// Pure predicate with no side effects. Callers must resolve relative
/// references against the page they were found on before asking; a
/// non-absolute candidate can never be in scope.
///
/// Rules, applied in order; the first failure rejects:
///
/// 1. The candidate must be absolute with an `http` or `https` scheme and
///    a host.
/// 2. The candidate host must match the seed host. An exact match always
///    passes, and explicit ports (when either URL carries one) must agree.
///    With `include_subdomains`, any host of the form `*.seedHost` also
///    passes. With `ignore_top_level_domain`, the final dot-separated
///    label is stripped from both hosts before comparing, so hosts that
///    differ only in their top-level domain compare equal; IP addresses
///    and single-label hosts are never stripped.
/// 3. With `include_links_with_query` off, a candidate with a non-empty
///    query component is rejected.
///
/// # Examples
///
/// ```
/// use sitemapper::config::SearchConfig;
/// use sitemapper::url::in_scope;
/// use url::Url;
///
/// let seed = Url::parse("http://site.com/").unwrap();
/// let same = Url::parse("http://site.com/about").unwrap();
/// let other = Url::parse("http://other.com/").unwrap();
///
/// let config = SearchConfig::default();
/// assert!(in_scope(&seed, &same, &config));
/// assert!(!in_scope(&seed, &other, &config));
/// ```
pub fn in_scope(seed: &Url, candidate: &Url, config: &SearchConfig) -> bool {
    // Rule 1: absolute http(s) URL with a host
    if candidate.scheme() != "http" && candidate.scheme() != "https" {
        return false;
    }
    let (seed_host, candidate_host) = match (seed.host_str(), candidate.host_str()) {
        (Some(s), Some(c)) => (s, c),
        _ => return false,
    };

    // Hosts that differ only in an explicit port are different servers
    if seed.port() != candidate.port() {
        return false;
    }

    // Rule 2: host comparison
    let seed_cmp = comparable_host(seed, seed_host, config);
    let candidate_cmp = comparable_host(candidate, candidate_host, config);
    let host_matches = candidate_cmp == seed_cmp
        || (config.include_subdomains && candidate_cmp.ends_with(&format!(".{}", seed_cmp)));
    if !host_matches {
        return false;
    }

    // Rule 3: query admission
    if !config.include_links_with_query && candidate.query().map_or(false, |q| !q.is_empty()) {
        return false;
    }

    true
}

/// Returns the host string used for comparison
///
/// With `ignore_top_level_domain` the final dot-separated label is dropped
/// from registered-name hosts; IP addresses and hosts without a dot are
/// returned unchanged.
fn comparable_host<'a>(url: &Url, host: &'a str, config: &SearchConfig) -> &'a str {
    if config.ignore_top_level_domain && matches!(url.host(), Some(Host::Domain(_))) {
        if let Some(idx) = host.rfind('.') {
            if idx > 0 {
                return &host[..idx];
            }
        }
    }
    host
}
