//! Index XML sitemap parser (component C7): collects `<loc>` entries from a
//! `<sitemapindex>` document and recurses into each one.

use std::collections::HashSet;

use crate::fetcher::SitemapFetcher;
use crate::model::AbstractSitemap;
use crate::url_utils::is_http_url;
use crate::user_agent::UserAgent;

#[derive(Default)]
pub(super) struct IndexXmlParserState {
    sub_sitemap_urls: Vec<String>,
    seen: HashSet<String>,
}

impl IndexXmlParserState {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn element_end(&mut self, name: &str, last_char_data: &str) {
        if name != "sitemap:loc" {
            return;
        }

        let sub_sitemap_url = last_char_data.trim().to_string();
        if !is_http_url(&sub_sitemap_url) {
            tracing::warn!(sub_sitemap_url, "sub-sitemap URL does not look like one");
            return;
        }

        if self.seen.insert(sub_sitemap_url.clone()) {
            self.sub_sitemap_urls.push(sub_sitemap_url);
        }
    }

    /// Recurses into every collected sub-sitemap URL at `recursion_level +
    /// 1` — only index-sitemap chains count against the recursion ceiling
    /// (spec §5). A failure at any single URL becomes an `InvalidSitemap`
    /// leaf and processing continues with the rest (spec invariant 7).
    pub(super) fn finish(
        self,
        url: &str,
        recursion_level: u32,
        ua: &dyn UserAgent,
    ) -> AbstractSitemap {
        let mut sub_sitemaps = Vec::with_capacity(self.sub_sitemap_urls.len());

        for sub_sitemap_url in self.sub_sitemap_urls {
            let fetched = match SitemapFetcher::new(&sub_sitemap_url, recursion_level + 1, ua) {
                Ok(fetcher) => fetcher.sitemap(),
                Err(e) => AbstractSitemap::InvalidSitemap {
                    url: sub_sitemap_url.clone(),
                    reason: format!("Unable to add sub-sitemap from URL {sub_sitemap_url}: {e}"),
                },
            };
            sub_sitemaps.push(fetched);
        }

        AbstractSitemap::IndexXMLSitemap {
            url: url.to_string(),
            sub_sitemaps,
        }
    }
}
