//! Hub client for fetching repository manifests.

mod manifest;

use edgefetch_core::{AcquireError, AcquireResult};

use crate::config::HfClientConfig;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::HfConfig;
use crate::url::EndpointResolver;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default hub client using the reqwest HTTP backend.
pub type DefaultHfClient = HfClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the hub API.
///
/// Generic over an HTTP backend so tests can inject canned responses. The
/// generic parameter `B` is an implementation detail; use `DefaultHfClient`.
pub struct HfClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: HfConfig,
    pub(crate) endpoints: EndpointResolver,
}

impl DefaultHfClient {
    /// Create a new client with the given configuration.
    pub fn new(config: &HfClientConfig) -> AcquireResult<Self> {
        let internal_config = HfConfig::from_public(config).map_err(|e| {
            AcquireError::configuration(format!("invalid hub client configuration: {e}"))
        })?;
        let backend = ReqwestBackend::new(&internal_config).map_err(|e| {
            AcquireError::configuration(format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self::with_backend(internal_config, backend))
    }

    /// Create a new client with default configuration.
    pub fn default_client() -> AcquireResult<Self> {
        Self::new(&HfClientConfig::default())
    }
}

impl<B: HttpBackend> HfClient<B> {
    /// Create a client over an arbitrary backend.
    pub(crate) fn with_backend(config: HfConfig, backend: B) -> Self {
        let endpoints = EndpointResolver::from_config(&config);
        Self {
            backend,
            config,
            endpoints,
        }
    }

    /// Per-call token, falling back to the configured default.
    pub(crate) fn effective_token<'a>(&'a self, token: Option<&'a str>) -> Option<&'a str> {
        token
            .filter(|t| !t.trim().is_empty())
            .or(self.config.token.as_deref())
    }
}
