//! In-process streaming downloader with range resumption.
//!
//! `Idle -> Requesting -> Fresh | Resuming -> Streaming -> Verifying -> Committed`,
//! with any failure ending in `Failed` and the `.part` file removed.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use edgefetch_core::download::{
    AcquireError, AcquireResult, DownloadTarget, ProgressCallback,
};
use edgefetch_core::settings::EngineSettings;
use futures_util::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::commit::{remove_quietly, verify_and_commit};
use super::http::{HttpTransport, TransferRequest, TransferResponse};
use super::{TransferBackend, TransferOutcome};
use crate::cache::CacheValidator;

/// Bytes of an error body read before giving up on the rest.
const ERROR_BODY_READ_LIMIT: usize = 4096;

/// Streams a response body into the `.part` file in fixed-size chunks.
pub struct StreamingDownloader {
    transport: Arc<dyn HttpTransport>,
    validator: CacheValidator,
    chunk_size: usize,
    read_timeout: Duration,
}

impl StreamingDownloader {
    /// Create a downloader over `transport` using the settings' chunk size and
    /// read timeout.
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &EngineSettings) -> Self {
        Self {
            transport,
            validator: CacheValidator::new(),
            chunk_size: settings.chunk_size.max(1),
            read_timeout: settings.read_timeout,
        }
    }

    /// Download `target`, resuming from an existing `.part` file when possible.
    pub async fn download(
        &self,
        target: &DownloadTarget,
        token: Option<&str>,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<TransferOutcome> {
        let offset = existing_len(&target.temporary_path).await;

        // A range starting at or past the end would only earn a 416.
        if let Some(expected) = target.expected_size_bytes {
            if offset > 0 && offset >= expected && !cancel.is_cancelled() {
                debug!(
                    file = %target.temporary_path.display(),
                    offset,
                    expected,
                    "Partial file already complete; verifying without a request"
                );
                progress(offset, Some(expected));
                let hash_verified = verify_and_commit(&self.validator, target).await?;
                return Ok(TransferOutcome {
                    bytes_transferred: 0,
                    resumed_from: offset,
                    hash_verified,
                });
            }
        }

        let request = TransferRequest {
            url: target.source_url.clone(),
            bearer_token: token.map(str::to_string),
            range_start: (offset > 0).then_some(offset),
        };

        debug!(url = %target.source_url, offset, "Requesting file body");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                remove_quietly(&target.temporary_path).await;
                return Err(AcquireError::Cancelled);
            }
            response = self.transport.get(request) => response?,
        };

        if !response.is_success() {
            return Err(status_error(&target.source_url, response).await);
        }

        let resumed_from = if offset > 0 && response.is_partial() {
            debug!(offset, "Server honored range; appending");
            offset
        } else {
            if offset > 0 {
                info!(
                    url = %target.source_url,
                    status = response.status,
                    "Server ignored range request; restarting from zero"
                );
            }
            0
        };

        let written = match self
            .stream_body(target, response, resumed_from, progress, cancel)
            .await
        {
            Ok(written) => written,
            Err(e) => {
                remove_quietly(&target.temporary_path).await;
                return Err(e);
            }
        };

        let hash_verified = verify_and_commit(&self.validator, target).await?;

        Ok(TransferOutcome {
            bytes_transferred: written,
            resumed_from,
            hash_verified,
        })
    }

    async fn stream_body(
        &self,
        target: &DownloadTarget,
        response: TransferResponse,
        resumed_from: u64,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<u64> {
        let mut options = OpenOptions::new();
        if resumed_from > 0 {
            options.append(true);
        } else {
            options.write(true).create(true).truncate(true);
        }
        let mut file = options.open(&target.temporary_path).await?;

        let total = response
            .content_length
            .map(|len| resumed_from + len)
            .or(target.expected_size_bytes);
        let mut body = response.body;
        let mut downloaded = resumed_from;

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(AcquireError::Cancelled),
                next = tokio::time::timeout(self.read_timeout, body.next()) => next,
            };

            let chunk = match next {
                Err(_elapsed) => {
                    return Err(AcquireError::transient(
                        "TimedOut",
                        format!(
                            "no data received for {}s from {}",
                            self.read_timeout.as_secs(),
                            target.source_url
                        ),
                    ));
                }
                Ok(None) => break,
                Ok(Some(chunk)) => chunk?,
            };

            for slice in chunk.chunks(self.chunk_size) {
                file.write_all(slice).await?;
                downloaded += slice.len() as u64;
                progress(downloaded, total);
            }
        }

        file.flush().await?;
        file.sync_all().await?;

        Ok(downloaded - resumed_from)
    }
}

#[async_trait]
impl TransferBackend for StreamingDownloader {
    fn name(&self) -> &'static str {
        "streaming"
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

async fn existing_len(path: &Path) -> u64 {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => 0,
    }
}

async fn status_error(url: &str, response: TransferResponse) -> AcquireError {
    match response.status {
        401 | 403 => AcquireError::unauthorized(
            response.status,
            format!("hub refused access to {url}"),
        ),
        404 => AcquireError::not_found(format!("file not found at {url}")),
        status => AcquireError::http(status, read_error_body(response).await),
    }
}

async fn read_error_body(response: TransferResponse) -> String {
    let mut body = response.body;
    let mut collected = Vec::new();
    while collected.len() < ERROR_BODY_READ_LIMIT {
        match body.next().await {
            Some(Ok(chunk)) => collected.extend_from_slice(&chunk),
            _ => break,
        }
    }
    String::from_utf8_lossy(&collected).into_owned()
}
