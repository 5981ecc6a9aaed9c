//! Plain-text sitemap parser (component C4): one URL per line.

use std::collections::HashSet;

use crate::model::{AbstractSitemap, SitemapPage};
use crate::url_utils::{is_http_url, normalize_url};

/// Parses a plain-text sitemap: non-empty trimmed lines that look like an
/// HTTP(S) URL become pages; everything else is dropped. Order-preserving,
/// de-duplicated by the normalized URL.
pub fn parse_text_sitemap(url: &str, content: &str) -> AbstractSitemap {
    let mut seen = HashSet::new();
    let mut pages = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !is_http_url(line) {
            tracing::debug!(line, "plain-text sitemap line doesn't look like a URL, skipping");
            continue;
        }

        let normalized = match normalize_url(line) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::error!(line, error = %e, "unable to normalize page URL, dropping page");
                continue;
            }
        };

        if seen.insert(normalized.clone()) {
            pages.push(SitemapPage::from_url(normalized));
        }
    }

    AbstractSitemap::PagesTextSitemap {
        url: url.to_string(),
        pages,
    }
}
