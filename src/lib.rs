//! Sitemap tree discovery: given a homepage URL, follows its `robots.txt`
//! `Sitemap:` directives through any nested sitemap indexes and returns a
//! tree enumerating every page the site publishes, with Google News
//! extension data attached where present.
//!
//! The only external collaborator is the injected [`UserAgent`] — this
//! crate never opens a socket itself.

mod dates;
mod error;
mod fetcher;
mod model;
mod robots_parser;
mod text_parser;
mod url_utils;
mod user_agent;
mod xml;

pub use error::FetcherError;
pub use fetcher::{sitemap_tree_for_homepage, SitemapFetcher, MAX_RECURSION_LEVEL};
pub use model::{
    AbstractSitemap, ChangeFrequency, SitemapNewsStory, SitemapPage,
    SITEMAP_PAGE_DEFAULT_PRIORITY,
};
pub use url_utils::{fix_common_url_mistakes, is_http_url, normalize_url};
pub use user_agent::{BlockingUserAgent, FetchConfig, Response, UserAgent};
