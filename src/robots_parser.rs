//! robots.txt parser (component C5): extracts `Sitemap:` directives and
//! recurses into each one at the same recursion level.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fetcher::SitemapFetcher;
use crate::model::AbstractSitemap;
use crate::url_utils::is_http_url;
use crate::user_agent::UserAgent;

// Case-insensitive on the `sitemap:` keyword only; the original Python
// implementation lowercased the whole line before matching, which corrupted
// the captured URL's case. This crate folds case on the directive keyword
// alone and matches against the *unmodified* line so the captured URL
// retains its original case (spec REDESIGN FLAGS).
static SITEMAP_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*sitemap:\s*(.+?)\s*$").unwrap());

/// Parses robots.txt `content`, fetching each distinct `Sitemap:` URL at
/// `recursion_level` (not incremented — only sitemap-index chains count
/// against the recursion ceiling, per spec §5) and wrapping the results as
/// an `IndexRobotsTxtSitemap`. An empty or directive-less robots.txt yields
/// an index sitemap with no sub-sitemaps, not an error (spec §4.5).
pub fn parse_robots_txt(
    url: &str,
    content: &str,
    recursion_level: u32,
    ua: &dyn UserAgent,
) -> AbstractSitemap {
    let mut seen = HashSet::new();
    let mut sitemap_urls = Vec::new();

    for line in content.lines() {
        let Some(captures) = SITEMAP_DIRECTIVE.captures(line) else {
            continue;
        };
        let sitemap_url = captures[1].to_string();

        if !is_http_url(&sitemap_url) {
            tracing::debug!(sitemap_url, "Sitemap: URL doesn't look like an URL, skipping");
            continue;
        }

        if seen.insert(sitemap_url.clone()) {
            sitemap_urls.push(sitemap_url);
        }
    }

    let mut sub_sitemaps = Vec::with_capacity(sitemap_urls.len());
    for sitemap_url in sitemap_urls {
        let fetched = match SitemapFetcher::new(&sitemap_url, recursion_level, ua) {
            Ok(fetcher) => fetcher.sitemap(),
            Err(e) => AbstractSitemap::InvalidSitemap {
                url: sitemap_url.clone(),
                reason: e.to_string(),
            },
        };
        sub_sitemaps.push(fetched);
    }

    AbstractSitemap::IndexRobotsTxtSitemap {
        url: url.to_string(),
        sub_sitemaps,
    }
}
