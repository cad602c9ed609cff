//! Sitemapper main entry point
//!
//! This is the command-line interface for the sitemapper crawler.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use futures::StreamExt;
use sitemapper::config::{CrawlerConfig, SearchConfig};
use sitemapper::crawler::Crawler;
use sitemapper::output::{priority_for_hops, CrawlStats, OutputFormat, UrlEntry, UrlSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sitemapper: generate a sitemap by crawling a website
///
/// Sitemapper visits every internally-reachable page of a site breadth-first,
/// starting from the target URL, and writes the discovered pages as a
/// sitemaps.org XML document or a plain text URL list.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version = "1.0.0")]
#[command(about = "Generate a sitemap by crawling a website", long_about = None)]
struct Cli {
    /// Seed URL the crawl starts from
    #[arg(short, long, value_name = "URL")]
    target: String,

    /// Destination file; the extension picks the format (.xml or .txt)
    #[arg(short, long, value_name = "PATH")]
    output: PathBuf,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Match hosts regardless of their final dot-label (site.org ~ site.com)
    #[arg(long)]
    ignore_top_level_domain: bool,

    /// Keep links that carry a query string
    #[arg(long)]
    include_query: bool,

    /// Follow links on subdomains of the target host
    #[arg(long)]
    include_subdomains: bool,

    /// Number of parallel fetches (0 uses the built-in default)
    #[arg(short, long, default_value_t = 0)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    timeout: u64,

    /// Stamp every entry with today's UTC date as lastmod
    #[arg(long)]
    lastmod: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    // Reject a bad output path before any network traffic happens.
    let format = OutputFormat::from_path(&cli.output)?;

    let scope = SearchConfig {
        ignore_top_level_domain: cli.ignore_top_level_domain,
        include_links_with_query: cli.include_query,
        include_subdomains: cli.include_subdomains,
    };
    let limits = CrawlerConfig {
        concurrency: cli.concurrency,
        fetch_timeout: Duration::from_secs(cli.timeout),
    };

    let crawler = Crawler::new(scope, limits)?;
    let mut results = crawler.crawl(&cli.target).await?;

    let lastmod = cli.lastmod.then(|| Utc::now().date_naive());
    let mut stats = CrawlStats::default();
    let mut url_set = UrlSet::default();

    while let Some(result) = results.next().await {
        stats.record(&result);
        match result.error {
            Some(err) => tracing::warn!("Failed to crawl {}: {}", result.url, err),
            None => {
                let mut entry = UrlEntry::new(result.url);
                entry.priority = Some(priority_for_hops(result.hops));
                entry.lastmod = lastmod;
                url_set.push(entry);
            }
        }

        if stats.total % 25 == 0 {
            tracing::info!(
                "Progress: {} pages visited, {} accepted",
                stats.total,
                stats.accepted
            );
        }
    }

    tracing::info!("Crawl finished: {}", stats);

    write_sitemap(&url_set, format, &cli.output)?;

    println!("✓ {} URLs written to {}", url_set.len(), cli.output.display());

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Writes the sitemap file in the selected format.
fn write_sitemap(url_set: &UrlSet, format: OutputFormat, path: &Path) -> anyhow::Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        OutputFormat::Xml => url_set.write_xml(&mut writer),
        OutputFormat::Plain => url_set.write_plain(&mut writer),
    }
    .and_then(|()| writer.flush())
    .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!("Wrote {} entries to {}", url_set.len(), path.display());
    Ok(())
}
