//! Transfer backends.
//!
//! Two strategies share one contract: write the body to the target's
//! `.part` file, verify it, then rename it into place. Every failure after
//! the first byte leaves neither the `.part` file nor the destination behind.

mod commit;
mod http;
mod reqwest_transport;
mod streaming;
mod system_bridge;

use async_trait::async_trait;
use edgefetch_core::download::{AcquireResult, DownloadTarget, ProgressCallback};
use tokio_util::sync::CancellationToken;

pub use http::{ByteStream, HttpTransport, TransferRequest, TransferResponse};
pub use reqwest_transport::ReqwestTransport;
pub use streaming::StreamingDownloader;
pub use system_bridge::SystemDownloadBridge;

pub(crate) use commit::remove_quietly;

/// What a finished transfer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Bytes received during this transfer.
    pub bytes_transferred: u64,
    /// Offset the transfer resumed from (0 for a fresh transfer).
    pub resumed_from: u64,
    /// Whether the declared hash was checked before commit.
    pub hash_verified: bool,
}

/// A way of moving one remote object into the cache.
#[async_trait]
pub trait TransferBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Transfer `target`, reporting `(downloaded, total)` through `progress`.
    ///
    /// On success the destination exists and passed verification.
    async fn transfer(
        &self,
        target: &DownloadTarget,
        token: Option<&str>,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<TransferOutcome>;
}
