//! Acquisition error types.
//!
//! These errors are designed to be serializable and not depend on external
//! error types like `std::io::Error`. For I/O errors, we capture the kind
//! and message as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of characters of an HTTP error body kept in [`AcquireError::Http`].
pub const ERROR_BODY_LIMIT: usize = 512;

/// Error type for model acquisition.
///
/// Designed to be serializable across process and UI boundaries without
/// depending on non-serializable types like `std::io::Error`.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AcquireError {
    /// No manifest, or no manifest entry matching the request.
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found (model ID, file, etc.).
        message: String,
    },

    /// The hub refused the request (401/403).
    #[error("Unauthorized (HTTP {status}): {message}")]
    Unauthorized {
        /// Raw HTTP status returned by the hub.
        status: u16,
        /// Detailed error message.
        message: String,
    },

    /// File length differs from the size declared by the manifest.
    #[error("Size mismatch for {path}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// File that failed the check.
        path: String,
        /// Declared size.
        expected: u64,
        /// Actual size on disk.
        actual: u64,
    },

    /// Content hash differs from the hash declared by the manifest.
    #[error("Hash mismatch for {path}: expected {expected}, got {actual}")]
    HashMismatch {
        /// File that failed the check.
        path: String,
        /// Declared hash (lowercase hex).
        expected: String,
        /// Computed hash (lowercase hex).
        actual: String,
    },

    /// Network or disk failure mid-transfer. The caller may retry.
    #[error("I/O error ({kind}): {message}")]
    TransientIo {
        /// The kind of I/O error (e.g., "`ConnectionReset`", "`TimedOut`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// Memory pressure mid-transfer.
    #[error("Out of resources: {message}")]
    OutOfResource {
        /// Detailed error message.
        message: String,
    },

    /// Non-success HTTP status when requesting a file body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to [`ERROR_BODY_LIMIT`] characters.
        body: String,
    },

    /// Renaming the temporary file to its final name failed.
    #[error("Failed to commit {path}: {message}")]
    Commit {
        /// Final destination path.
        path: String,
        /// Detailed error message.
        message: String,
    },

    /// The OS-managed download facility reported a failure.
    #[error("System download failed (reason {reason_code}): {message}")]
    SystemBackend {
        /// Reason code reported by the facility.
        reason_code: i32,
        /// Detailed error message.
        message: String,
    },

    /// The model reference could not be parsed or resolved.
    #[error("Invalid model reference: {message}")]
    InvalidReference {
        /// Detailed error message.
        message: String,
    },

    /// A required auxiliary file of a bundle could not be resolved.
    #[error("Bundle incomplete: {role} could not be resolved ({reason})")]
    BundleIncomplete {
        /// Auxiliary role that failed (e.g., "vae").
        role: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Invalid engine configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message.
        message: String,
    },

    /// Acquisition was cancelled by the caller.
    #[error("Acquisition cancelled")]
    Cancelled,
}

impl AcquireError {
    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an unauthorized error.
    pub fn unauthorized(status: u16, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            status,
            message: message.into(),
        }
    }

    /// Create a transient I/O error from kind and message strings.
    pub fn transient(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TransientIo {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an error from a `std::io::Error`.
    ///
    /// Memory exhaustion maps to `OutOfResource`; everything else is transient.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        if kind == std::io::ErrorKind::OutOfMemory {
            return Self::OutOfResource {
                message: err.to_string(),
            };
        }
        Self::TransientIo {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create an HTTP status error, truncating the body.
    pub fn http(status: u16, body: impl AsRef<str>) -> Self {
        Self::Http {
            status,
            body: truncate_body(body.as_ref()),
        }
    }

    /// Create an invalid reference error.
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::InvalidReference {
            message: message.into(),
        }
    }

    /// Create a bundle incomplete error.
    pub fn bundle_incomplete(role: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BundleIncomplete {
            role: role.into(),
            reason: reason.into(),
        }
    }

    /// Create a commit error.
    pub fn commit(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Commit {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable (the caller can retry).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::TransientIo { .. } | Self::Commit { .. } | Self::SystemBackend { .. }
        ) || matches!(self, Self::Http { status, .. } if *status >= 500)
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if this error means nothing matched the request.
    ///
    /// Used by bundle acquisition to tell "auxiliary unresolvable" apart from
    /// transfer failures.
    #[must_use]
    pub const fn is_unresolvable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidReference { .. })
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { message } => format!("Not found: {message}"),
            Self::Unauthorized { status, .. } => format!(
                "The hub refused access (HTTP {status}). Set HF_TOKEN or pass --token for gated models."
            ),
            Self::SizeMismatch { .. } | Self::HashMismatch { .. } => {
                "File integrity check failed. The corrupt file was removed; retry to download it again."
                    .to_string()
            }
            Self::TransientIo { message, .. } => {
                format!("Transfer interrupted: {message}. Retrying may succeed.")
            }
            Self::OutOfResource { message } => format!("Ran out of resources: {message}"),
            Self::Http { status, .. } => format!("Download failed with HTTP {status}"),
            Self::Commit { path, .. } => format!("Could not move the finished download to {path}"),
            Self::SystemBackend { message, .. } => format!("System download failed: {message}"),
            Self::InvalidReference { message } => format!("Invalid model reference: {message}"),
            Self::BundleIncomplete { role, reason } => {
                format!("Bundle is missing its {role} file: {reason}")
            }
            Self::Configuration { message } => format!("Configuration error: {message}"),
            Self::Cancelled => "Acquisition was cancelled.".to_string(),
        }
    }
}

impl From<std::io::Error> for AcquireError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_BODY_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Convenience result type for acquisition operations.
pub type AcquireResult<T> = Result<T, AcquireError>;
