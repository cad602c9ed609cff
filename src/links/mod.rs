//! HTML link extraction
//!
//! This module turns one HTML document, supplied as a byte stream, into an
//! asynchronous sequence of the hyperlinks found in its anchor elements.
//! It knows nothing about crawling, scope, or deduplication; href values
//! are handed over exactly as written in the markup.

use crate::ExtractError;
use futures::Stream;
use scraper::{Html, Selector};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Links buffered between the producer and a slow consumer; kept small so
/// a large page is streamed rather than collected
const LINK_BUFFER: usize = 32;

/// One hyperlink discovered in a document
///
/// `url` is the literal `href` attribute value and may be a relative
/// reference; resolving it against the page's own URL is the caller's job.
/// `name` is the anchor's trimmed text content and may be empty or shared
/// by several links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub url: String,
}

/// Asynchronous sequence of links extracted from one document
///
/// Yields `Ok(Link)` per qualifying anchor in document order, or a single
/// `Err(ExtractError)` if the underlying byte stream fails, after which
/// the sequence ends. Dropping the stream at any point stops the producer
/// and releases the reader.
pub struct LinkStream {
    inner: ReceiverStream<Result<Link, ExtractError>>,
}

impl Stream for LinkStream {
    type Item = Result<Link, ExtractError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Extracts every anchor link from an HTML byte stream
///
/// Emits one `Link` per `<a>` element carrying a non-empty `href`
/// attribute, in document order. Malformed markup never aborts the pass:
/// the HTML5 parser recovers and elements that fail to parse are skipped.
/// Duplicate hrefs within one document are each emitted; deduplication is
/// the crawler's responsibility.
///
/// Reading and parsing run on a background task, so links arrive while
/// the document is still being consumed. A read failure surfaces once as
/// the stream's final `Err` item.
pub fn extract_links<R>(reader: R) -> LinkStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let (tx, rx) = mpsc::channel(LINK_BUFFER);
    tokio::spawn(read_and_emit(reader, tx));
    LinkStream {
        inner: ReceiverStream::new(rx),
    }
}

async fn read_and_emit<R>(mut reader: R, tx: mpsc::Sender<Result<Link, ExtractError>>)
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let mut raw = Vec::new();
    tokio::select! {
        read = reader.read_to_end(&mut raw) => {
            if let Err(e) = read {
                let _ = tx.send(Err(ExtractError::Read(e))).await;
                return;
            }
        }
        // Consumer hung up while the body was still arriving; dropping the
        // reader releases the underlying connection.
        _ = tx.closed() => return,
    }
    drop(reader);

    let html = String::from_utf8_lossy(&raw).into_owned();
    drop(raw);

    // The parsed DOM is not Send and parsing is CPU-bound, so the whole
    // parse-and-emit pass runs on a blocking thread where the channel's
    // backpressure applies through blocking_send.
    let _ = tokio::task::spawn_blocking(move || emit_links(&html, &tx)).await;
}

fn emit_links(html: &str, tx: &mpsc::Sender<Result<Link, ExtractError>>) {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return,
    };

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };
        let name = element.text().collect::<String>().trim().to_string();
        let link = Link {
            name,
            url: href.to_string(),
        };
        if tx.blocking_send(Ok(link)).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io;
    use tokio::io::ReadBuf;

    async fn collect_links(html: &str) -> Vec<Link> {
        let reader = io::Cursor::new(html.as_bytes().to_vec());
        extract_links(reader)
            .map(|item| item.expect("extraction should succeed"))
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_emits_one_link_per_anchor_in_order() {
        let html = r##"<html><body>
            <a href="/page2">link_number_one</a>
            <a href="http://example.com/page3">link_number_two</a>
            <a href="#somewhere">link_number_three</a>
        </body></html>"##;

        let links = collect_links(html).await;
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].name, "link_number_one");
        assert_eq!(links[0].url, "/page2");
        assert_eq!(links[1].url, "http://example.com/page3");
        assert_eq!(links[2].url, "#somewhere");
    }

    #[tokio::test]
    async fn test_href_emitted_literally_unresolved() {
        let links = collect_links(r#"<a href="../up/one">up</a>"#).await;
        assert_eq!(links, vec![Link { name: "up".to_string(), url: "../up/one".to_string() }]);
    }

    #[tokio::test]
    async fn test_skips_empty_href() {
        let html = r#"<a href="">empty</a><a href="/real">real</a>"#;
        let links = collect_links(html).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/real");
    }

    #[tokio::test]
    async fn test_skips_anchor_without_href() {
        let html = r#"<a name="top">no href</a><a href="/page">yes</a>"#;
        let links = collect_links(html).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/page");
    }

    #[tokio::test]
    async fn test_duplicate_hrefs_each_emitted() {
        let html = r#"<a href="/same">one</a><a href="/same">two</a>"#;
        let links = collect_links(html).await;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].name, "one");
        assert_eq!(links[1].name, "two");
    }

    #[tokio::test]
    async fn test_name_is_concatenated_trimmed_text() {
        let html = r#"<a href="/x"> <b>Bold</b> and plain </a>"#;
        let links = collect_links(html).await;
        assert_eq!(links[0].name, "Bold and plain");
    }

    #[tokio::test]
    async fn test_empty_name_allowed() {
        let links = collect_links(r#"<a href="/img"><img src="i.png"></a>"#).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].name, "");
    }

    #[tokio::test]
    async fn test_malformed_markup_recovers() {
        let html = r#"<div><a href="/a">first<a href="/b">second</div><p><a href="/c">third"#;
        let links = collect_links(html).await;
        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["/a", "/b", "/c"]);
    }

    #[tokio::test]
    async fn test_empty_document_closes_without_items() {
        let links = collect_links("").await;
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_non_anchor_urls_ignored() {
        let html = r#"<img src="/pic.png"><link rel="stylesheet" href="/style.css"><a href="/only">a</a>"#;
        let links = collect_links(html).await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "/only");
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            )))
        }
    }

    #[tokio::test]
    async fn test_read_failure_yields_single_error_then_closes() {
        let mut stream = extract_links(FailingReader);
        let first = stream.next().await;
        assert!(matches!(first, Some(Err(ExtractError::Read(_)))));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_dropping_stream_early_is_safe() {
        let mut html = String::from("<html><body>");
        for i in 0..500 {
            html.push_str(&format!(r#"<a href="/page{}">p{}</a>"#, i, i));
        }
        html.push_str("</body></html>");

        let mut stream = extract_links(io::Cursor::new(html.into_bytes()));
        let first = stream.next().await;
        assert!(first.is_some());
        drop(stream);
        // Give the producer a beat to observe the closed channel
        tokio::task::yield_now().await;
    }
}
