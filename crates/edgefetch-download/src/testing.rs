//! Test doubles for the hub, the HTTP transport and the system service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use edgefetch_core::download::{
    AcquireError, AcquireResult, ProgressCallback, RemoteFileEntry,
};
use edgefetch_core::ports::{
    HubClientPort, SystemDownloadRequest, SystemDownloadService, SystemJobId, SystemJobStatus,
};
use futures_util::stream;

use crate::transfer::{ByteStream, HttpTransport, TransferRequest, TransferResponse};

mockall::mock! {
    pub SystemService {}

    #[async_trait]
    impl SystemDownloadService for SystemService {
        fn is_available(&self) -> bool;
        async fn enqueue(&self, request: SystemDownloadRequest) -> AcquireResult<SystemJobId>;
        async fn status(&self, id: SystemJobId) -> AcquireResult<SystemJobStatus>;
        async fn remove(&self, id: SystemJobId) -> AcquireResult<()>;
    }
}

/// Progress callback that ignores updates.
pub fn noop() -> ProgressCallback {
    edgefetch_core::download::noop_progress()
}

/// Progress callback recording every update.
pub fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<(u64, Option<u64>)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |downloaded, total| {
        sink.lock().unwrap().push((downloaded, total));
    });
    (callback, seen)
}

#[derive(Clone)]
enum Served {
    Object(Vec<u8>),
    Status(u16, String),
}

/// In-memory file server.
///
/// Honors `Range` unless told otherwise; unknown URLs answer 404.
#[derive(Default)]
pub struct FakeTransport {
    objects: HashMap<String, Served>,
    ignore_range: bool,
    body_chunk_size: Option<usize>,
    fail_after: Option<(usize, AcquireError)>,
    stall: bool,
    requests: Mutex<Vec<TransferRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, url: &str, content: Vec<u8>) -> Self {
        self.objects.insert(url.to_string(), Served::Object(content));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.objects
            .insert(url.to_string(), Served::Status(status, body.to_string()));
        self
    }

    pub const fn ignoring_range(mut self) -> Self {
        self.ignore_range = true;
        self
    }

    pub const fn with_body_chunk_size(mut self, size: usize) -> Self {
        self.body_chunk_size = Some(size);
        self
    }

    /// Yield `chunks` body chunks, then `error`.
    pub fn failing_after(mut self, chunks: usize, error: AcquireError) -> Self {
        self.fail_after = Some((chunks, error));
        self
    }

    /// Accept the request but never deliver a body chunk.
    pub const fn stalling(mut self) -> Self {
        self.stall = true;
        self
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn body(&self, content: &[u8]) -> ByteStream {
        if self.stall {
            return Box::pin(stream::pending());
        }

        let chunk_size = self.body_chunk_size.unwrap_or(content.len().max(1));
        let mut items: Vec<AcquireResult<Bytes>> = content
            .chunks(chunk_size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        if let Some((after, error)) = &self.fail_after {
            items.truncate(*after);
            items.push(Err(error.clone()));
        }
        Box::pin(stream::iter(items))
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, request: TransferRequest) -> AcquireResult<TransferResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let served = self
            .objects
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| Served::Status(404, "Entry not found".to_string()));

        match served {
            Served::Status(status, body) => Ok(TransferResponse {
                status,
                content_length: Some(body.len() as u64),
                body: Box::pin(stream::iter(vec![Ok(Bytes::from(body))])),
            }),
            Served::Object(content) => {
                let (status, served) = match request.range_start {
                    Some(offset) if !self.ignore_range => {
                        let start = usize::try_from(offset).unwrap().min(content.len());
                        (206, content[start..].to_vec())
                    }
                    _ => (200, content),
                };
                Ok(TransferResponse {
                    status,
                    content_length: Some(served.len() as u64),
                    body: self.body(&served),
                })
            }
        }
    }
}

/// Hub serving canned manifests.
#[derive(Default)]
pub struct FakeHub {
    manifests: HashMap<String, AcquireResult<Vec<RemoteFileEntry>>>,
    calls: AtomicUsize,
}

impl FakeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, model_id: &str, entries: Vec<RemoteFileEntry>) -> Self {
        self.manifests.insert(model_id.to_string(), Ok(entries));
        self
    }

    pub fn with_error(mut self, model_id: &str, error: AcquireError) -> Self {
        self.manifests.insert(model_id.to_string(), Err(error));
        self
    }

    pub fn manifest_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn url(model_id: &str, revision: &str, path: &str) -> String {
        format!("https://hub.test/{model_id}/resolve/{revision}/{path}")
    }
}

#[async_trait]
impl HubClientPort for FakeHub {
    async fn fetch_manifest(
        &self,
        model_id: &str,
        _revision: &str,
        _token: Option<&str>,
    ) -> AcquireResult<Vec<RemoteFileEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.manifests
            .get(model_id)
            .cloned()
            .unwrap_or_else(|| Err(AcquireError::not_found(format!("model '{model_id}'"))))
    }

    fn file_url(&self, model_id: &str, revision: &str, path: &str) -> String {
        Self::url(model_id, revision, path)
    }
}
