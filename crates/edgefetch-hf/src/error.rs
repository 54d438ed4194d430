//! Internal error types for hub operations.
//!
//! These errors are internal to `edgefetch-hf` and are mapped to
//! `AcquireError` at the port boundary.

use thiserror::Error;

/// Result type alias for hub operations.
pub type HfResult<T> = Result<T, HfError>;

/// Errors related to hub API operations.
#[derive(Debug, Error)]
pub enum HfError {
    /// API request failed with an HTTP error status.
    #[error("Hub API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from hub API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The model id is not `name` or `owner/name`.
    #[error("Invalid repository id '{model_id}'")]
    InvalidRepoId {
        /// The rejected id
        model_id: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl HfError {
    /// Whether the request may succeed if sent again.
    pub(crate) const fn is_retryable(&self) -> bool {
        match self {
            Self::ApiRequestFailed { status, .. } => *status >= 500 || *status == 429,
            Self::Network(_) => true,
            _ => false,
        }
    }
}
