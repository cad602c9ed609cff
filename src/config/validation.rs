use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates a caller-supplied seed URL
///
/// The seed must be an absolute URL with an `http` or `https` scheme and a
/// non-empty host. This is the only fatal input check in the crate: a seed
/// that fails here prevents the crawl from starting at all, whereas every
/// later per-URL problem is reported on the result stream instead.
///
/// # Arguments
///
/// * `raw` - The seed URL as entered by the caller
///
/// # Returns
///
/// * `Ok(Url)` - The parsed seed, ready to enqueue at depth 0
/// * `Err(ConfigError)` - The seed is relative, has an unsupported scheme,
///   or has no host
pub fn validate_seed_url(raw: &str) -> ConfigResult<Url> {
    let url = Url::parse(raw)?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_seed_url("http://example.com/").is_ok());
        assert!(validate_seed_url("https://example.com/docs").is_ok());
    }

    #[test]
    fn test_keeps_path_and_query() {
        let url = validate_seed_url("https://example.com/a/b?x=1").unwrap();
        assert_eq!(url.path(), "/a/b");
        assert_eq!(url.query(), Some("x=1"));
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(matches!(
            validate_seed_url("example.com/page"),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_seed_url("/just/a/path"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        assert!(matches!(
            validate_seed_url("ftp://example.com/"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            validate_seed_url("mailto:someone@example.com"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(validate_seed_url("").is_err());
    }
}
