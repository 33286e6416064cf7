pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{FetchError, Result};

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Statuses followed transparently when a `Location` header is present.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub method: Method,
    pub max_redirects: usize,
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            max_redirects: 5,
            timeout: Duration::from_secs(10),
        }
    }
}

impl FetchOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Outcome of one logical fetch after all redirects are resolved.
/// Immutable once returned.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub final_url: String,
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam for everything that issues HTTP retrievals. Scanners and probers
/// take `Arc<dyn Fetcher>` so tests can script responses.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, opts: &FetchOptions) -> Result<FetchResult>;

    /// Status of a URL via HEAD, retrying once with GET when the HEAD
    /// transport fails (some servers reject HEAD outright). `None` means
    /// both attempts died at the transport level.
    async fn status_of(&self, url: &str, opts: &FetchOptions) -> Option<u16> {
        let head = opts.clone().with_method(Method::Head);
        match self.fetch(url, &head).await {
            Ok(res) => Some(res.status),
            Err(_) => {
                let get = opts.clone().with_method(Method::Get);
                self.fetch(url, &get).await.ok().map(|res| res.status)
            }
        }
    }
}

/// HTTP fetch engine. Redirects are followed by an explicit bounded loop
/// rather than the client's built-in policy, so redirect exhaustion is a
/// typed failure and intermediate bodies are never buffered.
pub struct FetchClient {
    client: reqwest::Client,
}

impl FetchClient {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    async fn fetch(&self, url: &str, opts: &FetchOptions) -> Result<FetchResult> {
        let mut current =
            url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if current.scheme() != "http" && current.scheme() != "https" {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let mut budget = opts.max_redirects;

        loop {
            let request = match opts.method {
                Method::Get => self.client.get(current.clone()),
                Method::Head => self.client.head(current.clone()),
            }
            .header(reqwest::header::ACCEPT, ACCEPT_HEADER)
            .timeout(opts.timeout);

            let resp = request.send().await?;
            let status = resp.status().as_u16();

            if REDIRECT_STATUSES.contains(&status) {
                let location = resp
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);

                if let Some(location) = location {
                    if budget == 0 {
                        return Err(FetchError::TooManyRedirects(url.to_string()));
                    }
                    budget -= 1;

                    // Location may be absolute or relative to the current URL.
                    let next = current
                        .join(&location)
                        .map_err(|_| FetchError::InvalidUrl(location.clone()))?;
                    debug!(from = %current, to = %next, remaining = budget, "Following redirect");

                    // Dropping the response releases the connection without
                    // buffering the intermediate body.
                    drop(resp);
                    current = next;
                    continue;
                }
            }

            let mut headers = HashMap::new();
            for (name, value) in resp.headers() {
                if let Ok(v) = value.to_str() {
                    headers.insert(name.as_str().to_string(), v.to_string());
                }
            }
            let final_url = resp.url().to_string();
            let body = match opts.method {
                Method::Head => {
                    drop(resp);
                    String::new()
                }
                Method::Get => resp.text().await?,
            };

            return Ok(FetchResult {
                status,
                headers,
                body,
                final_url,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = FetchOptions::default();
        assert_eq!(opts.max_redirects, 5);
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.method, Method::Get);
    }

    #[tokio::test]
    async fn non_http_scheme_is_invalid() {
        let client = FetchClient::new("test-agent");
        let err = client
            .fetch("ftp://example.com", &FetchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn success_range() {
        let res = FetchResult {
            status: 204,
            headers: HashMap::new(),
            body: String::new(),
            final_url: "https://example.com".to_string(),
        };
        assert!(res.is_success());
    }
}
