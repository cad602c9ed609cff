//! Sitemap serialization
//!
//! This module renders the crawl's accepted URLs as either a sitemaps.org
//! 0.9 XML document or a plain text URL list, selected by the output file
//! extension.

use crate::{ConfigError, ConfigResult};
use chrono::NaiveDate;
use std::ffi::OsStr;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use url::Url;

/// Namespace required on the root element of a sitemap document.
const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Output flavor, chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// sitemaps.org 0.9 XML document
    Xml,
    /// One URL per line
    Plain,
}

impl OutputFormat {
    /// Selects the format from a path's extension (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedOutput`] for any extension other
    /// than `xml` or `txt`.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let extension = path.extension().and_then(OsStr::to_str).unwrap_or("");
        if extension.eq_ignore_ascii_case("xml") {
            Ok(OutputFormat::Xml)
        } else if extension.eq_ignore_ascii_case("txt") {
            Ok(OutputFormat::Plain)
        } else {
            Err(ConfigError::UnsupportedOutput(path.display().to_string()))
        }
    }
}

/// How frequently a page is likely to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// The lowercase token used inside `<changefreq>` elements.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `<url>` entry of a sitemap
#[derive(Debug, Clone)]
pub struct UrlEntry {
    /// Page location
    pub loc: Url,
    /// Date of last modification
    pub lastmod: Option<NaiveDate>,
    /// Expected change frequency
    pub changefreq: Option<ChangeFreq>,
    /// Relative crawl priority, 0.0 to 1.0
    pub priority: Option<f32>,
}

impl UrlEntry {
    /// Creates an entry with only the location set.
    pub fn new(loc: Url) -> Self {
        Self {
            loc,
            lastmod: None,
            changefreq: None,
            priority: None,
        }
    }
}

/// The full set of URLs to serialize
#[derive(Debug, Clone, Default)]
pub struct UrlSet {
    pub entries: Vec<UrlEntry>,
}

impl UrlSet {
    pub fn push(&mut self, entry: UrlEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the set as a sitemaps.org 0.9 XML document
    ///
    /// Optional fields are omitted from an entry rather than written empty.
    pub fn write_xml<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, r#"<urlset xmlns="{}">"#, SITEMAP_XMLNS)?;

        for entry in &self.entries {
            writeln!(writer, "  <url>")?;
            writeln!(writer, "    <loc>{}</loc>", escape_xml(entry.loc.as_str()))?;
            if let Some(lastmod) = entry.lastmod {
                writeln!(writer, "    <lastmod>{}</lastmod>", lastmod)?;
            }
            if let Some(changefreq) = entry.changefreq {
                writeln!(writer, "    <changefreq>{}</changefreq>", changefreq)?;
            }
            if let Some(priority) = entry.priority {
                writeln!(writer, "    <priority>{:.1}</priority>", priority)?;
            }
            writeln!(writer, "  </url>")?;
        }

        writeln!(writer, "</urlset>")
    }

    /// Writes the set as plain text, one URL per line
    pub fn write_plain<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}", entry.loc)?;
        }
        Ok(())
    }
}

/// Maps crawl depth to a sitemap priority
///
/// Seed pages get 1.0 and each additional hop halves, thirds, quarters the
/// weight: `1.0 / (hops + 1)`.
pub fn priority_for_hops(hops: u32) -> f32 {
    1.0 / (hops + 1) as f32
}

/// Escapes the five XML-reserved characters in text content.
fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
