//! Error types that can escape a [`crate::fetcher::SitemapFetcher`].
//!
//! Everything else in this crate is tolerant by design (spec §7): a bad
//! field, a failed sub-fetch, or truncated XML shrinks the returned tree
//! instead of propagating an error. `FetcherError` only covers the handful
//! of cases that abort constructing a single fetcher outright.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetcherError {
    #[error("URL {0} is not a HTTP(s) URL.")]
    InvalidUrl(String),

    #[error("Unable to normalize URL {url}: {reason}")]
    UrlNormalization { url: String, reason: String },

    #[error("Recursion level exceeded {max} for URL {url}.")]
    RecursionLimitExceeded { url: String, max: u32 },

    #[error("XML parsing error: {0}")]
    XmlParsing(String),
}
