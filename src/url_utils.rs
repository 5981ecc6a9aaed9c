//! URL fix-up, validation, and normalization (component C1).

use url::Url;

use crate::error::FetcherError;

/// Repairs the handful of URL mistakes commonly seen in the wild, just
/// enough for the result to stand a chance of passing [`is_http_url`].
///
/// This intentionally does not attempt to be a general-purpose URL fixer —
/// only the transformations that downstream sitemap/robots.txt parsing
/// actually needs.
pub fn fix_common_url_mistakes(url: &str) -> String {
    let mut fixed = url.trim().to_string();

    for scheme in ["http://", "https://"] {
        let doubled = format!("{scheme}{scheme}");
        if let Some(rest) = fixed.strip_prefix(&doubled) {
            fixed = format!("{scheme}{rest}");
        }
    }

    fixed
}

/// True iff `url` parses and has an `http`/`https` scheme with a well-formed
/// host.
pub fn is_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Normalizes `url`: lowercases scheme and host, strips the fragment and any
/// default port, resolves dot segments, and percent-encodes per RFC 3986.
/// Fails with [`FetcherError::UrlNormalization`] on unparseable or
/// non-HTTP(S) input.
pub fn normalize_url(url: &str) -> Result<String, FetcherError> {
    if !is_http_url(url) {
        return Err(FetcherError::InvalidUrl(url.to_string()));
    }

    let mut parsed = Url::parse(url).map_err(|e| FetcherError::UrlNormalization {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // `Url::parse` already lowercases the scheme and resolves `.`/`..`
    // segments in the path; what's left is host case-folding, fragment
    // removal, and stripping a redundant default port.
    if let Some(host) = parsed.host_str() {
        let lower_host = host.to_lowercase();
        parsed
            .set_host(Some(&lower_host))
            .map_err(|e| FetcherError::UrlNormalization {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
    }

    parsed.set_fragment(None);

    let is_default_port = matches!(
        (parsed.scheme(), parsed.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        let _ = parsed.set_port(None);
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixes_doubled_scheme() {
        assert_eq!(
            fix_common_url_mistakes("http://http://example.com/"),
            "http://example.com/"
        );
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(
            fix_common_url_mistakes("  https://example.com/  "),
            "https://example.com/"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(!is_http_url("ftp://example.com/"));
        assert!(!is_http_url("not a url"));
        assert!(!is_http_url(""));
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(is_http_url("http://example.com/"));
        assert!(is_http_url("https://example.com/path?query=1"));
    }

    #[test]
    fn normalize_strips_fragment_and_default_port() {
        let normalized = normalize_url("HTTP://Example.COM:80/Foo#section").unwrap();
        assert_eq!(normalized, "http://example.com/Foo");
    }

    #[test]
    fn normalize_is_a_fixed_point() {
        let normalized = normalize_url("https://example.com/a/../b/./c#frag").unwrap();
        assert_eq!(normalize_url(&normalized).unwrap(), normalized);
    }

    #[test]
    fn normalize_rejects_non_http() {
        assert!(normalize_url("not a url").is_err());
    }
}
