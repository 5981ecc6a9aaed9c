//! Fetcher / orchestrator (component C9): format sniffing, the recursion
//! ceiling, and the top-level `sitemap_tree_for_homepage` entry point.

use url::Url;

use crate::error::FetcherError;
use crate::model::AbstractSitemap;
use crate::robots_parser::parse_robots_txt;
use crate::text_parser::parse_text_sitemap;
use crate::url_utils::{fix_common_url_mistakes, is_http_url, normalize_url};
use crate::user_agent::{get_url_retry_on_client_errors, UserAgent};
use crate::xml::parse_xml;

/// Depth of the index-sitemap chain that a recursive descent is allowed to
/// reach before giving up (spec §3 invariant 6, §5).
pub const MAX_RECURSION_LEVEL: u32 = 10;

/// robots.txt / XML / plain-text sitemap fetcher for a single URL.
///
/// Constructing one validates and normalizes `url` and checks the recursion
/// ceiling; actually fetching and parsing happens in [`SitemapFetcher::sitemap`].
pub struct SitemapFetcher<'a> {
    url: String,
    recursion_level: u32,
    ua: &'a dyn UserAgent,
}

impl<'a> SitemapFetcher<'a> {
    pub fn new(url: &str, recursion_level: u32, ua: &'a dyn UserAgent) -> Result<Self, FetcherError> {
        if recursion_level > MAX_RECURSION_LEVEL {
            return Err(FetcherError::RecursionLimitExceeded {
                url: url.to_string(),
                max: MAX_RECURSION_LEVEL,
            });
        }

        let fixed = fix_common_url_mistakes(url);

        if !is_http_url(&fixed) {
            return Err(FetcherError::InvalidUrl(fixed));
        }

        let normalized = normalize_url(&fixed)?;

        Ok(Self {
            url: normalized,
            recursion_level,
            ua,
        })
    }

    /// Fetches `self.url`, sniffs its format, and dispatches to the
    /// matching parser. Never fails: any fetch or decode problem becomes an
    /// `InvalidSitemap` leaf (spec §4.9, §7).
    pub fn sitemap(&self) -> AbstractSitemap {
        tracing::info!(
            url = self.url,
            level = self.recursion_level,
            "fetching sitemap"
        );

        let response = get_url_retry_on_client_errors(&self.url, self.ua);
        if !response.is_success() {
            return AbstractSitemap::InvalidSitemap {
                url: self.url.clone(),
                reason: format!(
                    "Unable to fetch sitemap from {}: {}",
                    self.url,
                    response.status_line()
                ),
            };
        }

        let content = crate::user_agent::ungzipped_response_content(&self.url, &response);

        tracing::info!(url = self.url, "parsing sitemap");

        // MIME types in Content-Type are unpredictable in the wild, so peek
        // into the (trimmed) content instead of trusting the header.
        let sniff_window = {
            let trimmed = content.trim();
            let end = trimmed
                .char_indices()
                .nth(20)
                .map(|(i, _)| i)
                .unwrap_or(trimmed.len());
            &trimmed[..end]
        };

        if sniff_window.starts_with('<') {
            parse_xml(&self.url, &content, self.recursion_level, self.ua)
        } else if self.url.ends_with("/robots.txt") {
            parse_robots_txt(&self.url, &content, self.recursion_level, self.ua)
        } else {
            parse_text_sitemap(&self.url, &content)
        }
    }
}

/// Discovers the full sitemap tree advertised by `homepage_url`'s
/// `robots.txt`. Never panics or returns an `Err`: a robots.txt that can't
/// be fetched comes back as the root `InvalidSitemap` itself (spec §4.10).
pub fn sitemap_tree_for_homepage(homepage_url: &str, ua: &dyn UserAgent) -> AbstractSitemap {
    let robots_url = match robots_txt_url_for(homepage_url) {
        Ok(url) => url,
        Err(e) => {
            return AbstractSitemap::InvalidSitemap {
                url: homepage_url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    match SitemapFetcher::new(&robots_url, 0, ua) {
        Ok(fetcher) => fetcher.sitemap(),
        Err(e) => AbstractSitemap::InvalidSitemap {
            url: robots_url,
            reason: e.to_string(),
        },
    }
}

fn robots_txt_url_for(homepage_url: &str) -> Result<String, FetcherError> {
    let fixed = fix_common_url_mistakes(homepage_url);
    if !is_http_url(&fixed) {
        return Err(FetcherError::InvalidUrl(fixed));
    }

    let mut parsed = Url::parse(&fixed).map_err(|e| FetcherError::UrlNormalization {
        url: fixed.clone(),
        reason: e.to_string(),
    })?;
    parsed.set_path("/robots.txt");
    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok(parsed.to_string())
}
