//! Bridge to an OS-managed download facility.
//!
//! Enqueues one job writing to the `.part` file, polls it on a fixed tick,
//! then verifies and commits exactly like the streaming backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use edgefetch_core::download::{AcquireError, AcquireResult, DownloadTarget, ProgressCallback};
use edgefetch_core::ports::{
    SystemDownloadRequest, SystemDownloadService, SystemJobId, SystemJobStatus,
};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::commit::{remove_quietly, verify_and_commit};
use super::{TransferBackend, TransferOutcome};
use crate::cache::CacheValidator;

/// Polls a [`SystemDownloadService`] job to completion.
pub struct SystemDownloadBridge {
    service: Arc<dyn SystemDownloadService>,
    validator: CacheValidator,
    poll_interval: Duration,
}

impl SystemDownloadBridge {
    /// Create a bridge polling every `poll_interval`.
    pub fn new(service: Arc<dyn SystemDownloadService>, poll_interval: Duration) -> Self {
        Self {
            service,
            validator: CacheValidator::new(),
            poll_interval,
        }
    }

    /// Whether the underlying facility can be used.
    pub fn is_available(&self) -> bool {
        self.service.is_available()
    }

    /// Run one job for `target`.
    pub async fn download(
        &self,
        target: &DownloadTarget,
        token: Option<&str>,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<TransferOutcome> {
        // The facility cannot resume a partial file written by another backend.
        remove_quietly(&target.temporary_path).await;

        let title = target
            .destination_path
            .file_name()
            .map_or_else(|| target.source_url.clone(), |n| n.to_string_lossy().into_owned());
        let request = SystemDownloadRequest {
            url: target.source_url.clone(),
            bearer_token: token.map(str::to_string),
            destination: target.temporary_path.clone(),
            expected_size: target.expected_size_bytes,
            title,
        };

        let id = self.service.enqueue(request).await?;
        debug!(job = %id, url = %target.source_url, "Enqueued system download");

        let downloaded = self.poll(id, target, progress, cancel).await?;

        let hash_verified = verify_and_commit(&self.validator, target).await?;

        Ok(TransferOutcome {
            bytes_transferred: downloaded,
            resumed_from: 0,
            hash_verified,
        })
    }

    async fn poll(
        &self,
        id: SystemJobId,
        target: &DownloadTarget,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<u64> {
        let expected = target.expected_size_bytes;
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(job = %id, "Cancelling system download");
                    self.teardown(id, target).await;
                    return Err(AcquireError::Cancelled);
                }
                _ = ticker.tick() => {}
            }

            let status = match self.service.status(id).await {
                Ok(status) => status,
                Err(e) => {
                    self.teardown(id, target).await;
                    return Err(e);
                }
            };

            match status {
                SystemJobStatus::Pending => progress(0, expected),
                SystemJobStatus::Running {
                    downloaded_bytes,
                    total_bytes,
                } => progress(downloaded_bytes, total_bytes.or(expected)),
                SystemJobStatus::Succeeded { downloaded_bytes } => {
                    progress(downloaded_bytes, expected.or(Some(downloaded_bytes)));
                    if let Err(e) = self.service.remove(id).await {
                        debug!(job = %id, error = %e, "Failed to remove finished job");
                    }
                    return Ok(downloaded_bytes);
                }
                SystemJobStatus::Failed {
                    reason_code,
                    message,
                } => {
                    self.teardown(id, target).await;
                    return Err(AcquireError::SystemBackend {
                        reason_code,
                        message,
                    });
                }
            }
        }
    }

    async fn teardown(&self, id: SystemJobId, target: &DownloadTarget) {
        if let Err(e) = self.service.remove(id).await {
            warn!(job = %id, error = %e, "Failed to remove system download job");
        }
        remove_quietly(&target.temporary_path).await;
    }
}

#[async_trait]
impl TransferBackend for SystemDownloadBridge {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn transfer(
        &self,
        target: &DownloadTarget,
        token: Option<&str>,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<TransferOutcome> {
        self.download(target, token, progress, cancel).await
    }
}
