//! HTTP fetch helper (component C2): the `UserAgent` capability seam, a
//! default blocking implementation, client-error retry, and transparent
//! gzip decompression.

use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;

/// A single HTTP response as the engine needs it. Collaborators beyond this
/// crate (retry policy, timeouts, redirects) are the injected [`UserAgent`]'s
/// problem, per spec §1/§6 — this type is just the shape of what comes back.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn status_line(&self) -> String {
        format!("{} {}", self.status, self.status_text)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn content_bytes(&self) -> &[u8] {
        &self.body
    }
}

/// The injected HTTP capability. One blocking round trip per call; retry,
/// timeout, and redirect policy live at the transport's discretion — this
/// crate's only opinion is in [`get_url_retry_on_client_errors`], which
/// decides *when* to call `get` again.
pub trait UserAgent: Send + Sync {
    fn get(&self, url: &str) -> Response;
}

/// Contact info embedded in the default `UserAgent`'s User-Agent header, and
/// the handful of other transport tunables a caller might want to override
/// without writing their own [`UserAgent`] impl.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub contact: String,
    pub timeout: Duration,
    pub max_retry_attempts: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            contact: "info@mediacloud.org".to_string(),
            timeout: Duration::from_secs(30),
            max_retry_attempts: 5,
        }
    }
}

/// Default blocking [`UserAgent`] backed by `ureq`.
pub struct BlockingUserAgent {
    agent: ureq::Agent,
    user_agent: String,
}

impl BlockingUserAgent {
    pub fn new(config: &FetchConfig) -> Self {
        let user_agent = format!("mediawords sitemap / {}", config.contact);
        let agent = ureq::Agent::new_with_config(
            ureq::Agent::config_builder()
                .user_agent(&user_agent)
                .timeout_global(Some(config.timeout))
                // Non-2xx statuses still come back as `Ok` so this crate can
                // read the status line and body instead of treating every
                // 4xx/5xx as a hard transport error.
                .http_status_as_error(false)
                .build(),
        );
        Self { agent, user_agent }
    }
}

impl Default for BlockingUserAgent {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl UserAgent for BlockingUserAgent {
    fn get(&self, url: &str) -> Response {
        match self.agent.get(url).call() {
            Ok(mut resp) => {
                let status = resp.status().as_u16();
                let status_text = resp
                    .status()
                    .canonical_reason()
                    .unwrap_or("")
                    .to_string();
                let headers = resp
                    .headers()
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            value.to_str().unwrap_or("").to_string(),
                        )
                    })
                    .collect();
                let body = resp.body_mut().read_to_vec().unwrap_or_default();
                Response {
                    status,
                    status_text,
                    headers,
                    body,
                }
            }
            Err(e) => Response {
                status: 0,
                status_text: e.to_string(),
                headers: HashMap::new(),
                body: Vec::new(),
            },
        }
    }
}

impl std::fmt::Debug for BlockingUserAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingUserAgent")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Retries `ua.get(url)` on 4xx (other than 404/410, which are treated as
/// terminal "this really doesn't exist") and 5xx responses, with a small
/// linear backoff. Returns the last response regardless of outcome — callers
/// decide what a non-2xx final response means.
pub fn get_url_retry_on_client_errors(url: &str, ua: &dyn UserAgent) -> Response {
    get_url_retry_on_client_errors_with_attempts(url, ua, FetchConfig::default().max_retry_attempts)
}

fn get_url_retry_on_client_errors_with_attempts(
    url: &str,
    ua: &dyn UserAgent,
    max_attempts: u32,
) -> Response {
    let mut last_response = ua.get(url);

    for attempt in 1..max_attempts {
        if last_response.is_success() {
            return last_response;
        }

        let retryable = match last_response.status {
            404 | 410 => false,
            400..=599 => true,
            _ => false,
        };

        if !retryable {
            return last_response;
        }

        tracing::debug!(
            url,
            attempt,
            status = last_response.status,
            "retrying sitemap fetch after client/server error"
        );
        std::thread::sleep(Duration::from_millis(200 * u64::from(attempt)));
        last_response = ua.get(url);
    }

    last_response
}

/// Gunzips `response`'s body when any of the three spec-mandated signals
/// say it's gzipped, then decodes the result as UTF-8 with lossy
/// replacement. The magic-byte check is authoritative — `Content-Type` is
/// frequently wrong in the wild.
pub fn ungzipped_response_content(url: &str, response: &Response) -> String {
    let body = response.content_bytes();

    let looks_gzipped_by_extension = url_path_ends_in_gz(url);
    let looks_gzipped_by_content_type = response
        .header("content-type")
        .map(|ct| {
            let ct = ct.to_lowercase();
            ct.contains("application/x-gzip") || ct.contains("application/gzip")
        })
        .unwrap_or(false);
    let looks_gzipped_by_magic = body.len() >= 2 && body[0] == 0x1F && body[1] == 0x8B;

    if looks_gzipped_by_extension || looks_gzipped_by_content_type || looks_gzipped_by_magic {
        let mut decoder = GzDecoder::new(body);
        let mut decompressed = Vec::new();
        match decoder.read_to_end(&mut decompressed) {
            Ok(_) => return String::from_utf8_lossy(&decompressed).into_owned(),
            Err(e) => {
                tracing::warn!(url, error = %e, "gzip decompression failed, falling back to raw body");
            }
        }
    }

    String::from_utf8_lossy(body).into_owned()
}

fn url_path_ends_in_gz(url: &str) -> bool {
    url::Url::parse(url)
        .map(|u| u.path().ends_with(".gz"))
        .unwrap_or_else(|_| url.ends_with(".gz"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct ScriptedUserAgent {
        responses: Mutex<Vec<Response>>,
        calls: AtomicU32,
    }

    impl UserAgent for ScriptedUserAgent {
        fn get(&self, _url: &str) -> Response {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        }
    }

    fn ok_response(body: &str) -> Response {
        Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    fn status_response(status: u16) -> Response {
        Response {
            status,
            status_text: "".to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[test]
    fn retries_on_5xx_then_succeeds() {
        let ua = ScriptedUserAgent {
            responses: Mutex::new(vec![status_response(503), ok_response("hi")]),
            calls: AtomicU32::new(0),
        };
        let resp = get_url_retry_on_client_errors_with_attempts("http://x/", &ua, 5);
        assert!(resp.is_success());
        assert_eq!(ua.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn does_not_retry_404() {
        let ua = ScriptedUserAgent {
            responses: Mutex::new(vec![status_response(404)]),
            calls: AtomicU32::new(0),
        };
        let resp = get_url_retry_on_client_errors_with_attempts("http://x/", &ua, 5);
        assert_eq!(resp.status, 404);
        assert_eq!(ua.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gunzips_by_magic_bytes_regardless_of_labeling() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello sitemap").unwrap();
        let gz_bytes = encoder.finish().unwrap();

        let response = Response {
            status: 200,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            body: gz_bytes,
        };

        let content = ungzipped_response_content("http://example.com/sitemap.dat", &response);
        assert_eq!(content, "hello sitemap");
    }

    #[test]
    fn passes_through_plain_text() {
        let response = ok_response("https://example.com/\n");
        let content = ungzipped_response_content("http://example.com/sitemap.txt", &response);
        assert_eq!(content, "https://example.com/\n");
    }
}
