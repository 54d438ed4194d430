//! Engine settings and validation.
//!
//! Pure configuration values shared by the hub client, both transfer backends
//! and the orchestrator.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Default hub host used for file resolve URLs.
pub const DEFAULT_HUB_BASE_URL: &str = "https://huggingface.co";

/// Default hub API base.
pub const DEFAULT_HUB_API_BASE_URL: &str = "https://huggingface.co/api";

/// Default transfer chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Smallest accepted chunk size.
pub const MIN_CHUNK_SIZE: usize = 4 * 1024;

/// Largest accepted chunk size.
pub const MAX_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Default system-backend poll interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Default user agent.
pub const DEFAULT_USER_AGENT: &str = concat!("edgefetch/", env!("CARGO_PKG_VERSION"));

/// Settings validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Chunk size must be between {} and {} bytes, got {}", MIN_CHUNK_SIZE, MAX_CHUNK_SIZE, .0)]
    InvalidChunkSize(usize),

    #[error("Poll interval must be at least {}ms, got {}ms", MIN_POLL_INTERVAL.as_millis(), .0.as_millis())]
    InvalidPollInterval(Duration),

    #[error("{0} timeout must be non-zero")]
    ZeroTimeout(&'static str),

    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),

    #[error("Cache root cannot be empty")]
    EmptyCacheRoot,
}

/// Configuration of the acquisition engine.
#[derive(Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Directory holding every cached model.
    pub cache_root: PathBuf,
    /// Host for file resolve URLs.
    pub hub_base_url: String,
    /// Base for manifest (API) URLs.
    pub hub_api_base_url: String,
    /// Default bearer token; a per-call token takes precedence.
    pub token: Option<String>,
    /// Bytes written per chunk by the streaming downloader.
    pub chunk_size: usize,
    /// System-backend poll interval.
    pub poll_interval: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Longest wait for the next body chunk before failing.
    pub read_timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Retries for transient manifest failures.
    pub manifest_max_retries: u32,
    /// Initial backoff between manifest retries (doubled each attempt).
    pub manifest_retry_backoff: Duration,
}

impl EngineSettings {
    /// Settings with defaults for everything but the cache root.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            hub_base_url: DEFAULT_HUB_BASE_URL.to_string(),
            hub_api_base_url: DEFAULT_HUB_API_BASE_URL.to_string(),
            token: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            manifest_max_retries: 3,
            manifest_retry_backoff: Duration::from_millis(500),
        }
    }

    /// Set the default token (blank tokens are ignored).
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Set both hub URLs from one host, e.g. a mirror.
    #[must_use]
    pub fn with_hub_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_string();
        self.hub_api_base_url = format!("{base}/api");
        self.hub_base_url = base;
        self
    }

    /// Set the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the poll interval.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the read idle timeout.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set the manifest retry policy.
    #[must_use]
    pub const fn with_manifest_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.manifest_max_retries = retries;
        self.manifest_retry_backoff = backoff;
        self
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.cache_root.as_os_str().is_empty() {
            return Err(SettingsError::EmptyCacheRoot);
        }

        if !(MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(SettingsError::InvalidChunkSize(self.chunk_size));
        }

        if self.poll_interval < MIN_POLL_INTERVAL {
            return Err(SettingsError::InvalidPollInterval(self.poll_interval));
        }

        if self.connect_timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout("Connect"));
        }
        if self.read_timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout("Read"));
        }

        for url in [&self.hub_base_url, &self.hub_api_base_url] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(SettingsError::InvalidBaseUrl(url.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("cache_root", &self.cache_root)
            .field("hub_base_url", &self.hub_base_url)
            .field("hub_api_base_url", &self.hub_api_base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("chunk_size", &self.chunk_size)
            .field("poll_interval", &self.poll_interval)
            .field("connect_timeout", &self.connect_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("user_agent", &self.user_agent)
            .field("manifest_max_retries", &self.manifest_max_retries)
            .field("manifest_retry_backoff", &self.manifest_retry_backoff)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::new("/tmp/cache");
        assert_eq!(settings.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(settings.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(settings.hub_base_url, DEFAULT_HUB_BASE_URL);
        assert!(settings.token.is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_chunk_size() {
        let settings = EngineSettings::new("/tmp/cache").with_chunk_size(1024);
        assert_eq!(
            settings.validate(),
            Err(SettingsError::InvalidChunkSize(1024))
        );

        let settings = EngineSettings::new("/tmp/cache").with_chunk_size(MAX_CHUNK_SIZE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_poll_interval() {
        let settings =
            EngineSettings::new("/tmp/cache").with_poll_interval(Duration::from_millis(10));
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidPollInterval(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_root_and_bad_url() {
        assert_eq!(
            EngineSettings::new("").validate(),
            Err(SettingsError::EmptyCacheRoot)
        );

        let mut settings = EngineSettings::new("/tmp/cache");
        settings.hub_base_url = "ftp://mirror".to_string();
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_with_hub_base_url_sets_api_base() {
        let settings = EngineSettings::new("/tmp/cache").with_hub_base_url("https://hf-mirror.com/");
        assert_eq!(settings.hub_base_url, "https://hf-mirror.com");
        assert_eq!(settings.hub_api_base_url, "https://hf-mirror.com/api");
    }

    #[test]
    fn test_blank_token_is_ignored_and_redacted() {
        let settings = EngineSettings::new("/tmp/cache").with_token(Some("  ".to_string()));
        assert!(settings.token.is_none());

        let settings = EngineSettings::new("/tmp/cache").with_token(Some("hf_abc".to_string()));
        assert!(!format!("{settings:?}").contains("hf_abc"));
    }
}
