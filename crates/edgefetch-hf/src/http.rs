//! HTTP backend abstraction for the hub API.
//!
//! The production implementation uses reqwest with retry for transient
//! errors; tests swap in a fake backend of canned responses.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::error::{HfError, HfResult};
use crate::models::{HfConfig, JsonPage};

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that fetch JSON listings.
///
/// This is an implementation detail - external code should use the
/// `HubClientPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch one JSON page, with the next-page link if the server sent one.
    async fn get_page(&self, url: &Url, token: Option<&str>) -> HfResult<JsonPage>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx, 429)
/// and network errors. Other 4xx statuses fail immediately.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &HfConfig) -> HfResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url, token: Option<&str>) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Send one request and turn non-success statuses into errors.
    async fn fetch_once(&self, url: &Url, token: Option<&str>) -> HfResult<reqwest::Response> {
        let response = self.build_request(url, token).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(HfError::ApiRequestFailed {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(
        &self,
        url: &Url,
        token: Option<&str>,
    ) -> HfResult<reqwest::Response> {
        let mut attempt: u8 = 0;
        loop {
            match self.fetch_once(url, token).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = Duration::from_millis(
                        self.retry_base_delay_ms
                            .saturating_mul(2u64.saturating_pow(u32::from(attempt))),
                    );
                    tracing::debug!(
                        url = %url,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        error = %e,
                        "Retrying hub request"
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_page(&self, url: &Url, token: Option<&str>) -> HfResult<JsonPage> {
        let response = self.fetch_with_retry(url, token).await?;

        let next = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(parse_next_link);

        let body: serde_json::Value = response.json().await?;
        Ok(JsonPage { body, next })
    }
}

/// Extract the `rel="next"` target from a `Link` header.
pub fn parse_next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.contains("rel=\"next\"") {
            return None;
        }
        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Url::parse(target).ok()
    })
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================
