//! Shared fixtures for orchestrator integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use edgefetch_core::download::{AcquireError, AcquireResult, RemoteFileEntry};
use edgefetch_core::ports::HubClientPort;
use edgefetch_core::settings::EngineSettings;
use edgefetch_download::{
    AcquisitionOrchestrator, AliasTable, HttpTransport, ModelRegistry, OrchestratorDeps,
    TransferRequest, TransferResponse,
};
use futures_util::stream;

pub const HOST: &str = "https://hub.test";

pub fn resolve_url(model_id: &str, path: &str) -> String {
    format!("{HOST}/{model_id}/resolve/main/{path}")
}

/// Hub with fixed manifests; unknown ids are `NotFound`.
#[derive(Default)]
pub struct StaticHub {
    manifests: HashMap<String, Vec<RemoteFileEntry>>,
}

impl StaticHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, model_id: &str, entries: Vec<RemoteFileEntry>) -> Self {
        self.manifests.insert(model_id.to_string(), entries);
        self
    }
}

#[async_trait]
impl HubClientPort for StaticHub {
    async fn fetch_manifest(
        &self,
        model_id: &str,
        _revision: &str,
        _token: Option<&str>,
    ) -> AcquireResult<Vec<RemoteFileEntry>> {
        self.manifests
            .get(model_id)
            .cloned()
            .ok_or_else(|| AcquireError::not_found(format!("model '{model_id}'")))
    }

    fn file_url(&self, model_id: &str, revision: &str, path: &str) -> String {
        format!("{HOST}/{model_id}/resolve/{revision}/{path}")
    }
}

/// Serves byte objects by URL, optionally ignoring `Range` or failing mid-body.
#[derive(Default)]
pub struct ObjectServer {
    objects: HashMap<String, Vec<u8>>,
    ignore_range: bool,
    failure: Option<(usize, AcquireError)>,
    log: Mutex<Vec<TransferRequest>>,
}

impl ObjectServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: String, content: &[u8]) -> Self {
        self.objects.insert(url, content.to_vec());
        self
    }

    pub fn ignore_range(mut self) -> Self {
        self.ignore_range = true;
        self
    }

    /// Deliver `bytes` of the body, then fail with `error`.
    pub fn fail_after(mut self, bytes: usize, error: AcquireError) -> Self {
        self.failure = Some((bytes, error));
        self
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ObjectServer {
    async fn get(&self, request: TransferRequest) -> AcquireResult<TransferResponse> {
        self.log.lock().unwrap().push(request.clone());

        let Some(content) = self.objects.get(&request.url) else {
            return Ok(TransferResponse {
                status: 404,
                content_length: None,
                body: Box::pin(stream::empty()),
            });
        };

        let (status, body) = match request.range_start {
            Some(offset) if !self.ignore_range => (206, content[offset as usize..].to_vec()),
            _ => (200, content.clone()),
        };
        let length = body.len() as u64;

        let items: Vec<AcquireResult<Bytes>> = match &self.failure {
            Some((after, error)) => vec![
                Ok(Bytes::copy_from_slice(&body[..(*after).min(body.len())])),
                Err(error.clone()),
            ],
            None => vec![Ok(Bytes::from(body))],
        };

        Ok(TransferResponse {
            status,
            content_length: Some(length),
            body: Box::pin(stream::iter(items)),
        })
    }
}

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub server: Arc<ObjectServer>,
    pub orchestrator: AcquisitionOrchestrator,
}

impl Fixture {
    pub fn new(hub: StaticHub, server: ObjectServer) -> Self {
        Self::with_registry(hub, server, ModelRegistry::new())
    }

    pub fn with_registry(hub: StaticHub, server: ObjectServer, registry: ModelRegistry) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = EngineSettings::new(dir.path().join("models"));
        let server = Arc::new(server);
        let orchestrator = AcquisitionOrchestrator::new(
            &settings,
            OrchestratorDeps {
                hub: Arc::new(hub),
                transport: Arc::clone(&server) as Arc<dyn HttpTransport>,
                system_service: None,
                aliases: AliasTable::builtin(),
                registry,
            },
        )
        .unwrap();
        Self {
            dir,
            server,
            orchestrator,
        }
    }

    /// Final path of `file` of `org/name` at `main`.
    pub fn cached(&self, model_id: &str, file: &str) -> PathBuf {
        self.dir
            .path()
            .join("models")
            .join(model_id.replace('/', "--"))
            .join("main")
            .join(file)
    }

    pub fn partial(&self, model_id: &str, file: &str) -> PathBuf {
        let mut path = self.cached(model_id, file).into_os_string();
        path.push(".part");
        PathBuf::from(path)
    }

    /// Place `content` at `path`, creating parents.
    pub fn seed(&self, path: &Path, content: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}
