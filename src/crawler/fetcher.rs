//! HTTP fetching for the crawl workers
//!
//! This module owns all network access for the crawler:
//! - Building the shared HTTP client with a proper user agent string
//! - GET requests for candidate pages, following redirects
//! - Classifying responses before the body is consumed
//!
//! The response body is exposed as an [`AsyncRead`] rather than a buffered
//! string so link extraction can start while bytes are still arriving.

use crate::FetchError;
use futures::{StreamExt, TryStreamExt};
use reqwest::{header, Client};
use std::io;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use url::Url;

/// User agent sent with every request, e.g. `sitemapper/1.0.0`.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A successfully fetched page, body not yet consumed
pub struct FetchedPage<R> {
    /// Final URL after any redirects; link resolution is relative to this
    pub final_url: Url,
    /// Whether the Content-Type indicates an HTML document
    pub is_html: bool,
    /// Response body, readable as it arrives from the network
    pub body: R,
}

impl<R> std::fmt::Debug for FetchedPage<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchedPage")
            .field("final_url", &self.final_url)
            .field("is_html", &self.is_html)
            .finish_non_exhaustive()
    }
}

/// Builds the HTTP client shared by all crawl workers
///
/// # Arguments
///
/// * `timeout` - Overall per-request timeout, covering the full body read
///
/// # Example
///
/// ```no_run
/// use sitemapper::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single page and classifies the response
///
/// Redirects are followed by the client; `final_url` reports where the
/// response actually came from so relative links resolve against it.
///
/// # Errors
///
/// * [`FetchError::Http`] - The request could not be completed (DNS,
///   connection, timeout, too many redirects)
/// * [`FetchError::Status`] - The server answered with a non-2xx status
pub async fn fetch_page(
    client: &Client,
    url: &Url,
) -> Result<FetchedPage<impl AsyncRead + Send + Unpin + 'static>, FetchError> {
    let response = client.get(url.clone()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let final_url = response.url().clone();

    // A missing Content-Type header is treated as HTML so bare responses
    // from minimal servers still get their links extracted.
    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map_or(true, |value| {
            value.to_str().map_or(false, |v| v.contains("text/html"))
        });

    let body = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
        .boxed();

    Ok(FetchedPage {
        final_url,
        is_html,
        body: StreamReader::new(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body>hello</body></html>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/index", server.uri())).unwrap();
        let mut page = fetch_page(&client, &url).await.unwrap();

        assert!(page.is_html);
        assert_eq!(page.final_url, url);

        let mut body = Vec::new();
        page.body.read_to_end(&mut body).await.unwrap();
        assert_eq!(body, b"<html><body>hello</body></html>");
    }

    #[tokio::test]
    async fn test_fetch_non_html_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/report.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_string("%PDF-1.4"),
            )
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/report.pdf", server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert!(!page.is_html);
    }

    #[tokio::test]
    async fn test_fetch_missing_content_type_treated_as_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bare"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/bare", server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert!(page.is_html);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = fetch_page(&client, &url).await.unwrap_err();

        match err {
            FetchError::Status(status) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/new"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse(&format!("{}/old", server.uri())).unwrap();
        let page = fetch_page(&client, &url).await.unwrap();

        assert!(page.final_url.path().ends_with("/new"));
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        // Nothing listens on port 1, so the connection is refused.
        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = fetch_page(&client, &url).await.unwrap_err();

        assert!(matches!(err, FetchError::Http(_)));
    }
}
