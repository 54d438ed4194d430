//! Internal API response types for the hub.
//!
//! These types are internal to `edgefetch-hf`. Consumers see
//! `RemoteFileEntry` from `edgefetch-core`.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::config::HfClientConfig;
use crate::error::HfResult;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration for the hub client.
#[derive(Debug, Clone)]
pub struct HfConfig {
    /// Base URL for API requests (default: <https://huggingface.co/api>)
    pub api_base: Url,
    /// Base URL for file resolve URLs (default: <https://huggingface.co>)
    pub hub_base: Url,
    /// Default authentication token
    pub token: Option<String>,
    /// User agent
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Maximum number of retry attempts for transient errors (default: 3)
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff (default: 500)
    pub retry_base_delay_ms: u64,
}

impl HfConfig {
    /// Validate and convert the public configuration.
    pub fn from_public(config: &HfClientConfig) -> HfResult<Self> {
        Ok(Self {
            api_base: Url::parse(&config.api_base_url)?,
            hub_base: Url::parse(&config.hub_base_url)?,
            token: config.token.clone().filter(|t| !t.trim().is_empty()),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            max_retries: config.max_retries,
            retry_base_delay_ms: u64::try_from(config.retry_base_delay.as_millis())
                .unwrap_or(u64::MAX),
        })
    }
}

// ============================================================================
// Repository Reference
// ============================================================================

/// Reference to a hub repository: `name` or `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HfRepoRef {
    /// Repository owner (user or organization), absent for legacy root-level repos
    pub owner: Option<String>,
    /// Repository name
    pub name: String,
}

impl HfRepoRef {
    /// Parse a repository reference from a model ID string.
    pub fn parse(model_id: &str) -> Option<Self> {
        let parts: Vec<&str> = model_id.split('/').collect();
        match parts.as_slice() {
            [name] if !name.is_empty() => Some(Self {
                owner: None,
                name: (*name).to_string(),
            }),
            [owner, name] if !owner.is_empty() && !name.is_empty() => Some(Self {
                owner: Some((*owner).to_string()),
                name: (*name).to_string(),
            }),
            _ => None,
        }
    }

    /// Get the full model ID.
    pub fn id(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}/{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for HfRepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

// ============================================================================
// Tree Entry
// ============================================================================

/// Raw entry of the tree listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HfTreeEntry {
    /// Path relative to repository root
    pub path: String,
    /// `file` or `directory`; absent in some listing modes
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Git blob size (the pointer size for large files)
    #[serde(default)]
    pub size: Option<u64>,
    /// Large-file storage metadata
    #[serde(default)]
    pub lfs: Option<HfLfsInfo>,
}

/// Large-file storage metadata of a tree entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HfLfsInfo {
    /// SHA-256 of the content (bare hex, or `sha256:`-prefixed)
    #[serde(default)]
    pub oid: Option<String>,
    /// Explicit hash algorithm
    #[serde(rename = "hashAlgorithm", default)]
    pub hash_algorithm: Option<String>,
    /// Explicit hash value
    #[serde(default)]
    pub hash: Option<String>,
    /// Real content size
    #[serde(default)]
    pub size: Option<u64>,
}

/// One page of a JSON listing.
#[derive(Debug, Clone)]
pub struct JsonPage {
    /// Response body
    pub body: serde_json::Value,
    /// Next page from the `Link` header
    pub next: Option<Url>,
}
