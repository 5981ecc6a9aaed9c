//! Sitemap object model (component C3): immutable value types for pages,
//! news stories, and the tagged tree of sitemap variants.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Default priority (spec §3) applied whenever the source value is missing
/// or outside `[0.0, 1.0]`.
pub const SITEMAP_PAGE_DEFAULT_PRIORITY: f64 = 0.5;

/// Recrawl-cadence hint. Falls back to `Always` when the source value is
/// unrecognized (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl Default for ChangeFrequency {
    fn default() -> Self {
        ChangeFrequency::Always
    }
}

impl ChangeFrequency {
    /// Parses a `<changefreq>` value, falling back to [`ChangeFrequency::Always`]
    /// for anything unrecognized rather than failing the document.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "always" => ChangeFrequency::Always,
            "hourly" => ChangeFrequency::Hourly,
            "daily" => ChangeFrequency::Daily,
            "weekly" => ChangeFrequency::Weekly,
            "monthly" => ChangeFrequency::Monthly,
            "yearly" => ChangeFrequency::Yearly,
            "never" => ChangeFrequency::Never,
            _ => ChangeFrequency::Always,
        }
    }
}

/// A Google News extension record, present only when both `title` and
/// `publish_date` were parseable (spec §3 invariant 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapNewsStory {
    pub title: String,
    pub publish_date: DateTime<FixedOffset>,
    pub publication_name: Option<String>,
    pub publication_language: Option<String>,
    pub access: Option<String>,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    pub stock_tickers: Vec<String>,
}

/// A single discovered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapPage {
    pub url: String,
    pub last_modified: Option<DateTime<FixedOffset>>,
    pub change_frequency: ChangeFrequency,
    pub priority: f64,
    pub news_story: Option<SitemapNewsStory>,
}

impl SitemapPage {
    /// A page with only its URL set, as emitted by the plain-text parser.
    pub fn from_url(url: String) -> Self {
        Self {
            url,
            last_modified: None,
            change_frequency: ChangeFrequency::default(),
            priority: SITEMAP_PAGE_DEFAULT_PRIORITY,
            news_story: None,
        }
    }
}

/// The discovered sitemap tree, rooted at an `IndexRobotsTxtSitemap`. Exactly
/// one variant per node; every variant can be flattened into its leaf pages
/// via [`AbstractSitemap::all_pages`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum AbstractSitemap {
    IndexRobotsTxtSitemap {
        url: String,
        sub_sitemaps: Vec<AbstractSitemap>,
    },
    IndexXMLSitemap {
        url: String,
        sub_sitemaps: Vec<AbstractSitemap>,
    },
    PagesXMLSitemap {
        url: String,
        pages: Vec<SitemapPage>,
    },
    PagesTextSitemap {
        url: String,
        pages: Vec<SitemapPage>,
    },
    InvalidSitemap {
        url: String,
        reason: String,
    },
}

impl AbstractSitemap {
    pub fn url(&self) -> &str {
        match self {
            AbstractSitemap::IndexRobotsTxtSitemap { url, .. }
            | AbstractSitemap::IndexXMLSitemap { url, .. }
            | AbstractSitemap::PagesXMLSitemap { url, .. }
            | AbstractSitemap::PagesTextSitemap { url, .. }
            | AbstractSitemap::InvalidSitemap { url, .. } => url,
        }
    }

    /// Flattens the subtree into its distinct leaf pages, document order,
    /// pre-order over sub-sitemaps, de-duplicated by URL (spec §3).
    pub fn all_pages(&self) -> Vec<SitemapPage> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_pages(&mut seen, &mut out);
        out
    }

    fn collect_pages(&self, seen: &mut HashSet<String>, out: &mut Vec<SitemapPage>) {
        match self {
            AbstractSitemap::IndexRobotsTxtSitemap { sub_sitemaps, .. }
            | AbstractSitemap::IndexXMLSitemap { sub_sitemaps, .. } => {
                for sub in sub_sitemaps {
                    sub.collect_pages(seen, out);
                }
            }
            AbstractSitemap::PagesXMLSitemap { pages, .. }
            | AbstractSitemap::PagesTextSitemap { pages, .. } => {
                for page in pages {
                    if seen.insert(page.url.clone()) {
                        out.push(page.clone());
                    }
                }
            }
            AbstractSitemap::InvalidSitemap { .. } => {}
        }
    }
}
