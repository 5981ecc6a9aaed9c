//! Publication / last-modified timestamp parsing.
//!
//! Accepts ISO 8601 with an explicit timezone (the W3C datetime profile
//! sitemaps.org uses for `<lastmod>` and Google News uses for
//! `<news:publication_date>`) and RFC 822/1123. Dates without a
//! time-of-day or without a timezone are rejected — that's a
//! `FieldValidationError` in spec terms, so this returns `None` rather than
//! an `Err` (spec §6, §7).

use chrono::{DateTime, FixedOffset};

const W3C_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%:z",
    "%Y-%m-%dT%H:%M%:z",
];

pub fn parse_sitemap_publication_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }

    for format in W3C_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt);
    }

    None
}
