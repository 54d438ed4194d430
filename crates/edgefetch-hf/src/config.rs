//! Public configuration for the hub client.
//!
//! The internal config is derived from this.

use std::time::Duration;

use edgefetch_core::EngineSettings;
use edgefetch_core::settings::{DEFAULT_HUB_API_BASE_URL, DEFAULT_HUB_BASE_URL};

/// Configuration for the hub client.
///
/// # Example
///
/// ```
/// use edgefetch_hf::HfClientConfig;
/// use std::time::Duration;
///
/// let config = HfClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HfClientConfig {
    /// Base URL for API (manifest) requests
    pub(crate) api_base_url: String,
    /// Base URL for file resolve URLs
    pub(crate) hub_base_url: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Connect timeout
    pub(crate) connect_timeout: Duration,
    /// Default token, used when a call does not supply one
    pub(crate) token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
}

impl Default for HfClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_HUB_API_BASE_URL.to_string(),
            hub_base_url: DEFAULT_HUB_BASE_URL.to_string(),
            user_agent: concat!("edgefetch-hf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            token: None,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl HfClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a configuration from engine settings.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new()
            .with_api_base_url(settings.hub_api_base_url.clone())
            .with_hub_base_url(settings.hub_base_url.clone())
            .with_user_agent(settings.user_agent.clone())
            .with_connect_timeout(settings.connect_timeout)
            .with_optional_token(settings.token.clone())
            .with_max_retries(u8::try_from(settings.manifest_max_retries).unwrap_or(u8::MAX))
            .with_retry_delay(settings.manifest_retry_backoff)
    }

    /// Set the API base URL.
    ///
    /// Defaults to `https://huggingface.co/api`.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the base URL used for file resolve URLs.
    ///
    /// Defaults to `https://huggingface.co`.
    #[must_use]
    pub fn with_hub_base_url(mut self, url: impl Into<String>) -> Self {
        self.hub_base_url = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set an authentication token for gated or private models.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional authentication token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HfClientConfig::new();
        assert_eq!(config.api_base_url, "https://huggingface.co/api");
        assert_eq!(config.hub_base_url, "https://huggingface.co");
        assert!(config.user_agent.contains("edgefetch-hf"));
        assert!(config.token.is_none());
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = HfClientConfig::new()
            .with_api_base_url("https://mirror/api")
            .with_user_agent("test-agent")
            .with_timeout(Duration::from_secs(60))
            .with_token("secret")
            .with_max_retries(5);

        assert_eq!(config.api_base_url, "https://mirror/api");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.token, Some("secret".to_string()));
        assert_eq!(config.max_retries, 5);
    }

    #[test]
    fn test_from_settings() {
        let settings = EngineSettings::new("/tmp/cache")
            .with_hub_base_url("https://hf-mirror.com")
            .with_token(Some("hf_x".to_string()))
            .with_manifest_retries(7, Duration::from_millis(10));

        let config = HfClientConfig::from_settings(&settings);
        assert_eq!(config.api_base_url, "https://hf-mirror.com/api");
        assert_eq!(config.hub_base_url, "https://hf-mirror.com");
        assert_eq!(config.token.as_deref(), Some("hf_x"));
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.retry_base_delay, Duration::from_millis(10));
    }
}
