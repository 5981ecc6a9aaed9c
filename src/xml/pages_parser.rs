//! Pages XML sitemap parser (component C8): accumulates `<url>` fields and
//! Google News extension fields, emitting one `SitemapPage` per completed,
//! structurally-distinct `<url>` entry.

use crate::dates::parse_sitemap_publication_date;
use crate::error::FetcherError;
use crate::model::{
    AbstractSitemap, ChangeFrequency, SitemapNewsStory, SitemapPage, SITEMAP_PAGE_DEFAULT_PRIORITY,
};
use crate::url_utils::normalize_url;

#[derive(Debug, Default, Clone, PartialEq)]
struct PageBuilder {
    url: Option<String>,
    last_modified: Option<String>,
    change_frequency: Option<String>,
    priority: Option<String>,
    news_title: Option<String>,
    news_publish_date: Option<String>,
    news_publication_name: Option<String>,
    news_publication_language: Option<String>,
    news_access: Option<String>,
    news_genres: Option<String>,
    news_keywords: Option<String>,
    news_stock_tickers: Option<String>,
}

impl PageBuilder {
    /// Builds the final `SitemapPage`, or `None` if the URL is unset or
    /// fails to normalize (spec invariant 2: such pages are dropped, not
    /// propagated as invalid).
    fn build(self) -> Option<SitemapPage> {
        let raw_url = self.url?.trim().to_string();
        if raw_url.is_empty() {
            return None;
        }

        let url = match normalize_url(&raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!(url = raw_url, error = %e, "unable to normalize page URL, dropping page");
                return None;
            }
        };

        let last_modified = self
            .last_modified
            .as_deref()
            .and_then(parse_sitemap_publication_date);

        let change_frequency = self
            .change_frequency
            .as_deref()
            .map(ChangeFrequency::parse_or_default)
            .unwrap_or_default();

        let priority = parse_priority(self.priority.as_deref());

        let news_story = build_news_story(&self);

        Some(SitemapPage {
            url,
            last_modified,
            change_frequency,
            priority,
            news_story,
        })
    }
}

fn parse_priority(raw: Option<&str>) -> f64 {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if (0.0..=1.0).contains(&value) => value,
            Ok(value) => {
                tracing::warn!(priority = value, "priority is not within 0 and 1");
                SITEMAP_PAGE_DEFAULT_PRIORITY
            }
            Err(_) => {
                tracing::warn!(raw, "priority is not a number");
                SITEMAP_PAGE_DEFAULT_PRIORITY
            }
        },
        None => SITEMAP_PAGE_DEFAULT_PRIORITY,
    }
}

fn split_comma_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn build_news_story(builder: &PageBuilder) -> Option<SitemapNewsStory> {
    let title = builder.news_title.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let publish_date = builder
        .news_publish_date
        .as_deref()
        .and_then(parse_sitemap_publication_date)?;

    Some(SitemapNewsStory {
        title: title.to_string(),
        publish_date,
        publication_name: non_empty(builder.news_publication_name.as_deref()),
        publication_language: non_empty(builder.news_publication_language.as_deref()),
        access: non_empty(builder.news_access.as_deref()),
        genres: split_comma_list(builder.news_genres.as_deref()),
        keywords: split_comma_list(builder.news_keywords.as_deref()),
        stock_tickers: split_comma_list(builder.news_stock_tickers.as_deref()),
    })
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[derive(Default)]
pub(super) struct PagesXmlParserState {
    current: Option<PageBuilder>,
    pages: Vec<PageBuilder>,
}

impl PagesXmlParserState {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn element_start(&mut self, name: &str) -> Result<(), FetcherError> {
        if name == "sitemap:url" {
            if self.current.is_some() {
                return Err(FetcherError::XmlParsing(
                    "Page is expected to be unset by <url>.".to_string(),
                ));
            }
            self.current = Some(PageBuilder::default());
        }
        Ok(())
    }

    pub(super) fn element_end(&mut self, name: &str, last_char_data: &str) {
        if name == "sitemap:url" {
            if let Some(builder) = self.current.take() {
                if !self.pages.contains(&builder) {
                    self.pages.push(builder);
                }
            }
            return;
        }

        let Some(current) = self.current.as_mut() else {
            // Outside of a <url> entry (e.g. the closing </urlset> tag, or a
            // malformed document) — nothing to accumulate into.
            return;
        };

        let text = last_char_data.trim().to_string();
        match name {
            "sitemap:loc" => current.url = Some(text),
            "sitemap:lastmod" => current.last_modified = Some(text),
            "sitemap:changefreq" => current.change_frequency = Some(text),
            "sitemap:priority" => current.priority = Some(text),
            "news:name" => current.news_publication_name = Some(text),
            "news:language" => current.news_publication_language = Some(text),
            "news:publication_date" => current.news_publish_date = Some(text),
            "news:title" => current.news_title = Some(text),
            "news:access" => current.news_access = Some(text),
            "news:genres" => current.news_genres = Some(text),
            "news:keywords" => current.news_keywords = Some(text),
            "news:stock_tickers" => current.news_stock_tickers = Some(text),
            // xhtml:link and anything from an unrecognized namespace.
            _ => {}
        }
    }

    pub(super) fn finish(self, url: &str) -> AbstractSitemap {
        let pages = self.pages.into_iter().filter_map(PageBuilder::build).collect();
        AbstractSitemap::PagesXMLSitemap {
            url: url.to_string(),
            pages,
        }
    }
}
