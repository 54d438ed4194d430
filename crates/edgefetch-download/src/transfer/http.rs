//! HTTP transport seam used by the streaming downloader.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use edgefetch_core::download::AcquireResult;
use futures_util::Stream;

/// Response body as a stream of chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = AcquireResult<Bytes>> + Send>>;

/// One GET for a file body.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Resolve URL.
    pub url: String,
    /// Bearer token.
    pub bearer_token: Option<String>,
    /// Send `Range: bytes=<offset>-` when set.
    pub range_start: Option<u64>,
}

impl fmt::Debug for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferRequest")
            .field("url", &self.url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("range_start", &self.range_start)
            .finish()
    }
}

/// Status line plus a streaming body.
pub struct TransferResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Length` of this response (not of the whole object).
    pub content_length: Option<u64>,
    /// Body chunks.
    pub body: ByteStream,
}

impl TransferResponse {
    /// Whether the status is 2xx.
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Whether the server honored a range request.
    pub const fn is_partial(&self) -> bool {
        self.status == 206
    }
}

impl fmt::Debug for TransferResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferResponse")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Issues body GETs. Implemented over reqwest, and by fakes in tests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request; the body is not read yet.
    async fn get(&self, request: TransferRequest) -> AcquireResult<TransferResponse>;
}
