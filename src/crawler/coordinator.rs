//! Crawl orchestration
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding and draining the frontier queue
//! - Dispatching URLs to a bounded pool of fetch workers
//! - Tracking in-flight work to detect when the crawl is finished
//! - Streaming per-URL results back to the caller
//!
//! The frontier lives inside a single coordinator task and is never shared,
//! so checking the seen-set and enqueueing a URL is one sequential step.
//! Workers only fetch and extract; everything they discover flows back to
//! the coordinator as a [`WorkerReport`].

use crate::config::{CrawlerConfig, SearchConfig};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::links::extract_links;
use crate::url::in_scope;
use crate::{validate_seed_url, CrawlError, FetchError, Result};
use futures::{Stream, StreamExt};
use reqwest::Client;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Worker pool size used when the configured concurrency is zero.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Results buffered between the coordinator and a slow consumer.
const RESULT_BUFFER: usize = 32;

/// A reusable crawl engine
///
/// Holds the scope rules, the limits, and the HTTP client shared by every
/// crawl started from it.
pub struct Crawler {
    scope: SearchConfig,
    limits: CrawlerConfig,
    client: Client,
}

/// One crawled URL on the result stream
///
/// Exactly one of these is produced for every unique in-scope URL the
/// crawl attempted, whether or not the fetch succeeded.
#[derive(Debug)]
pub struct SearchResult {
    /// The URL that was fetched, in normalized form
    pub url: Url,
    /// Number of links followed from the seed to reach this page
    pub hops: u32,
    /// The failure for this URL, if the fetch did not succeed
    pub error: Option<FetchError>,
}

impl SearchResult {
    /// Returns true if the page was fetched successfully.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Stream of [`SearchResult`]s for one crawl
///
/// The stream ends when every reachable in-scope URL has been visited.
/// Dropping it cancels the crawl.
pub struct SearchResults {
    inner: ReceiverStream<SearchResult>,
    cancel: CancellationToken,
}

impl SearchResults {
    /// Stops the crawl early.
    ///
    /// Nothing further is queued and in-flight fetches are abandoned; the
    /// stream ends once the workers have wound down. Results that were
    /// already buffered can still be read.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for SearchResults {
    type Item = SearchResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for SearchResults {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `scope` - Rules deciding which discovered URLs belong to the site
    /// * `limits` - Worker pool size and per-request timeout
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Client`] if the HTTP client cannot be built.
    pub fn new(scope: SearchConfig, limits: CrawlerConfig) -> Result<Self> {
        let client = build_http_client(limits.fetch_timeout).map_err(CrawlError::Client)?;
        Ok(Self {
            scope,
            limits,
            client,
        })
    }

    /// Starts a breadth-first crawl from `seed`
    ///
    /// Returns a stream with one [`SearchResult`] per unique in-scope URL.
    /// Individual pages that fail to fetch appear on the stream with their
    /// error attached and are never retried; the crawl itself keeps going.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Config`] if the seed is not an absolute
    /// http(s) URL with a host. An unreachable seed is not a setup error:
    /// it produces a stream with a single failed result.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use futures::StreamExt;
    /// use sitemapper::{Crawler, CrawlerConfig, SearchConfig};
    ///
    /// # async fn example() -> sitemapper::Result<()> {
    /// let crawler = Crawler::new(SearchConfig::default(), CrawlerConfig::default())?;
    /// let mut results = crawler.crawl("https://example.com/").await?;
    /// while let Some(result) = results.next().await {
    ///     println!("{} ({} hops)", result.url, result.hops);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, seed: &str) -> Result<SearchResults> {
        let seed = validate_seed_url(seed)?;
        let concurrency = match self.limits.concurrency {
            0 => DEFAULT_CONCURRENCY,
            n => n,
        };

        let cancel = CancellationToken::new();
        let (result_tx, result_rx) = mpsc::channel(RESULT_BUFFER);

        tokio::spawn(coordinate(
            self.client.clone(),
            self.scope.clone(),
            seed,
            concurrency,
            result_tx,
            cancel.clone(),
        ));

        Ok(SearchResults {
            inner: ReceiverStream::new(result_rx),
            cancel,
        })
    }
}

/// State shared by every worker in the pool
struct WorkerContext {
    client: Client,
    seed: Url,
    scope: SearchConfig,
}

/// Outcome of one fetch, reported back to the coordinator
struct WorkerReport {
    url: Url,
    hops: u32,
    error: Option<FetchError>,
    discovered: Vec<Url>,
}

/// Runs the coordinator task for one crawl
///
/// The coordinator owns the frontier and the in-flight counter. The crawl
/// is finished exactly when the frontier is empty and no worker is busy.
async fn coordinate(
    client: Client,
    scope: SearchConfig,
    seed: Url,
    concurrency: usize,
    result_tx: mpsc::Sender<SearchResult>,
    cancel: CancellationToken,
) {
    tracing::info!("Starting crawl of {}", seed);

    let mut frontier = Frontier::default();
    frontier.try_enqueue(&seed, 0);

    let (dispatch_tx, dispatch_rx) = mpsc::channel(concurrency);
    // Capacity matches the pool so a full set of in-flight reports never
    // blocks a worker, even after the coordinator stops reading.
    let (report_tx, mut report_rx) = mpsc::channel(concurrency);

    let context = Arc::new(WorkerContext {
        client,
        seed,
        scope,
    });
    let workers = tokio::spawn(run_workers(
        dispatch_rx,
        report_tx,
        context,
        concurrency,
        cancel.clone(),
    ));

    let mut outstanding: usize = 0;
    let mut draining = false;

    while outstanding > 0 || (!draining && !frontier.is_empty()) {
        tokio::select! {
            // Hand the next queued URL to the pool. Reserving first keeps
            // this branch from blocking the loop while all workers are busy.
            permit = dispatch_tx.reserve(), if !draining && !frontier.is_empty() => {
                match permit {
                    Ok(permit) => {
                        if let Some(entry) = frontier.pop() {
                            outstanding += 1;
                            permit.send(entry);
                        }
                    }
                    Err(_) => break,
                }
            }
            report = report_rx.recv() => {
                let report = match report {
                    Some(report) => report,
                    None => break,
                };
                outstanding -= 1;
                if !draining && !handle_report(report, &mut frontier, &result_tx, &cancel).await {
                    draining = true;
                    frontier.clear_pending();
                }
            }
            _ = cancel.cancelled(), if !draining => {
                tracing::debug!("Crawl cancelled, draining {} in-flight fetches", outstanding);
                draining = true;
                frontier.clear_pending();
            }
        }
    }

    drop(dispatch_tx);
    let _ = workers.await;
    tracing::debug!("Crawl finished");
}

/// Folds one worker report into the frontier and emits its result
///
/// Returns false when no further results can be delivered, either because
/// the crawl was cancelled mid-send or the consumer dropped the stream.
async fn handle_report(
    report: WorkerReport,
    frontier: &mut Frontier,
    result_tx: &mpsc::Sender<SearchResult>,
    cancel: &CancellationToken,
) -> bool {
    let WorkerReport {
        url,
        hops,
        error,
        discovered,
    } = report;

    for found in &discovered {
        if frontier.try_enqueue(found, hops + 1) {
            tracing::trace!("Queued {} ({} hops)", found, hops + 1);
        }
    }

    match &error {
        Some(err) => tracing::warn!("Failed to fetch {}: {}", url, err),
        None => tracing::debug!("Crawled {} ({} links in scope)", url, discovered.len()),
    }

    let result = SearchResult { url, hops, error };
    tokio::select! {
        sent = result_tx.send(result) => {
            if sent.is_err() {
                cancel.cancel();
                return false;
            }
            true
        }
        _ = cancel.cancelled() => false,
    }
}

/// Runs the bounded worker pool until the dispatch channel closes
///
/// At most `concurrency` fetches are in flight at a time. Every dispatched
/// URL produces exactly one report, even when the fetch is abandoned
/// because the crawl was cancelled; the coordinator relies on that to keep
/// its in-flight count accurate.
async fn run_workers(
    dispatch_rx: mpsc::Receiver<FrontierEntry>,
    report_tx: mpsc::Sender<WorkerReport>,
    context: Arc<WorkerContext>,
    concurrency: usize,
    cancel: CancellationToken,
) {
    ReceiverStream::new(dispatch_rx)
        .for_each_concurrent(concurrency, |entry| {
            let context = Arc::clone(&context);
            let report_tx = report_tx.clone();
            let cancel = cancel.clone();
            async move {
                let url = entry.url.clone();
                let hops = entry.hops;
                let report = tokio::select! {
                    report = process_entry(&context, entry) => report,
                    _ = cancel.cancelled() => WorkerReport {
                        url,
                        hops,
                        error: None,
                        discovered: Vec::new(),
                    },
                };
                let _ = report_tx.send(report).await;
            }
        })
        .await;
}

/// Fetches one page and collects its in-scope links
///
/// Fetch failures are captured in the report, never raised: a page that
/// cannot be fetched still settles its URL. A body that breaks mid-read
/// fails the whole page, and any links already seen from it are discarded
/// so a torn document cannot feed the frontier.
async fn process_entry(context: &WorkerContext, entry: FrontierEntry) -> WorkerReport {
    let FrontierEntry { url, hops } = entry;
    tracing::debug!("Fetching {} ({} hops)", url, hops);

    let page = match fetch_page(&context.client, &url).await {
        Ok(page) => page,
        Err(err) => {
            return WorkerReport {
                url,
                hops,
                error: Some(err),
                discovered: Vec::new(),
            }
        }
    };

    // Non-HTML responses count as visited but contribute no links.
    if !page.is_html {
        return WorkerReport {
            url,
            hops,
            error: None,
            discovered: Vec::new(),
        };
    }

    let base = page.final_url;
    let mut links = extract_links(page.body);
    let mut discovered = Vec::new();
    let mut error = None;

    while let Some(link) = links.next().await {
        match link {
            Ok(link) => {
                let resolved = match base.join(&link.url) {
                    Ok(resolved) => resolved,
                    Err(_) => {
                        tracing::trace!("Skipping unresolvable href {:?}", link.url);
                        continue;
                    }
                };
                if in_scope(&context.seed, &resolved, &context.scope) {
                    discovered.push(resolved);
                }
            }
            Err(err) => {
                discovered.clear();
                error = Some(FetchError::from(err));
                break;
            }
        }
    }

    WorkerReport {
        url,
        hops,
        error,
        discovered,
    }
}
