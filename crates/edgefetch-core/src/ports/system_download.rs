//! OS-managed download facility port.
//!
//! Abstracts a download service that runs outside the engine's transfer loop
//! (a platform download manager, or an external process). The engine enqueues
//! one job per file and polls it until a terminal state.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::download::AcquireResult;

/// Opaque identifier of an enqueued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SystemJobId(pub u64);

impl fmt::Display for SystemJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

/// A job to hand to the facility.
#[derive(Clone, PartialEq, Eq)]
pub struct SystemDownloadRequest {
    /// Resolve URL.
    pub url: String,
    /// Bearer token sent as an `Authorization` header.
    pub bearer_token: Option<String>,
    /// File the facility writes to.
    pub destination: PathBuf,
    /// Size declared by the manifest.
    pub expected_size: Option<u64>,
    /// Human-readable title (shown by platform download managers).
    pub title: String,
}

impl fmt::Debug for SystemDownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemDownloadRequest")
            .field("url", &self.url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("destination", &self.destination)
            .field("expected_size", &self.expected_size)
            .field("title", &self.title)
            .finish()
    }
}

/// Status of an enqueued job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SystemJobStatus {
    /// Queued, not started.
    Pending,
    /// Transferring.
    Running {
        /// Bytes written so far.
        downloaded_bytes: u64,
        /// Total bytes, when known.
        total_bytes: Option<u64>,
    },
    /// Finished; the destination holds the full body.
    Succeeded {
        /// Bytes written.
        downloaded_bytes: u64,
    },
    /// Finished with an error.
    Failed {
        /// Facility-specific reason code.
        reason_code: i32,
        /// Detailed message.
        message: String,
    },
}

impl SystemJobStatus {
    /// Whether polling can stop.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }
}

/// Port trait for the OS-managed download facility.
#[async_trait]
pub trait SystemDownloadService: Send + Sync {
    /// Whether the facility can be used on this host.
    fn is_available(&self) -> bool;

    /// Enqueue a job.
    async fn enqueue(&self, request: SystemDownloadRequest) -> AcquireResult<SystemJobId>;

    /// Query the current status of a job.
    async fn status(&self, id: SystemJobId) -> AcquireResult<SystemJobStatus>;

    /// Remove a job, stopping it if it is still running. Unknown ids are ignored.
    async fn remove(&self, id: SystemJobId) -> AcquireResult<()>;
}
