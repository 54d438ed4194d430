use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use edgefetch_core::download::{
    AcquireError, BundleDescriptor, BundleRole, ContentHash, FileRef, RemoteFileEntry,
};
use edgefetch_core::ports::{SystemJobId, SystemJobStatus};
use edgefetch_core::settings::EngineSettings;
use tokio_test::{assert_err, assert_ok};

use super::*;
use crate::testing::{FakeHub, FakeTransport, MockSystemService, noop};

// sha256("abcdef")
const ABCDEF_SHA256: &str = "bef57ec7f53a6d40beb640a780a639c83bc29ac8a9816f1fc6c5c6dcd93c4721";

struct Harness {
    _dir: tempfile::TempDir,
    settings: EngineSettings,
    hub: Arc<FakeHub>,
    transport: Arc<FakeTransport>,
}

impl Harness {
    fn new(hub: FakeHub, transport: FakeTransport) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = EngineSettings::new(dir.path().join("cache"))
            .with_poll_interval(std::time::Duration::from_millis(50));
        Self {
            _dir: dir,
            settings,
            hub: Arc::new(hub),
            transport: Arc::new(transport),
        }
    }

    fn orchestrator(&self, system: Option<MockSystemService>) -> AcquisitionOrchestrator {
        AcquisitionOrchestrator::new(
            &self.settings,
            OrchestratorDeps {
                hub: Arc::clone(&self.hub) as Arc<dyn HubClientPort>,
                transport: Arc::clone(&self.transport) as Arc<dyn HttpTransport>,
                system_service: system.map(|s| Arc::new(s) as Arc<dyn SystemDownloadService>),
                aliases: AliasTable::builtin(),
                registry: ModelRegistry::new(),
            },
        )
        .unwrap()
    }

    fn dest(&self, model_dir: &str, file: &str) -> PathBuf {
        self.settings.cache_root.join(model_dir).join("main").join(file)
    }
}

fn single_file_hub() -> FakeHub {
    FakeHub::new().with_manifest(
        "org/m",
        vec![
            RemoteFileEntry::file("README.md").with_size(3),
            RemoteFileEntry::file("m-Q4_0.gguf").with_size(6),
        ],
    )
}

fn single_file_transport() -> FakeTransport {
    FakeTransport::new().with_object(
        &FakeHub::url("org/m", "main", "m-Q4_0.gguf"),
        b"abcdef".to_vec(),
    )
}

#[tokio::test]
async fn test_download_then_cache_hit() {
    let harness = Harness::new(single_file_hub(), single_file_transport());
    let orchestrator = harness.orchestrator(None);
    let request = AcquireRequest::new("org/m");

    let first = assert_ok!(orchestrator.acquire(&request, noop()).await);
    assert!(!first.from_cache);
    assert_eq!(first.local_file, harness.dest("org--m", "m-Q4_0.gguf"));
    assert_eq!(first.file_metadata.size_bytes, 6);

    let second = assert_ok!(orchestrator.acquire(&request, noop()).await);
    assert!(second.from_cache);
    assert_eq!(harness.transport.requests().len(), 1);
    assert_eq!(harness.hub.manifest_calls(), 2);
}

#[tokio::test]
async fn test_force_refresh_downloads_again() {
    let harness = Harness::new(single_file_hub(), single_file_transport());
    let orchestrator = harness.orchestrator(None);

    assert_ok!(orchestrator.acquire(&AcquireRequest::new("org/m"), noop()).await);
    let result = assert_ok!(
        orchestrator
            .acquire(&AcquireRequest::new("org/m").force_refresh(true), noop())
            .await
    );

    assert!(!result.from_cache);
    assert_eq!(harness.transport.requests().len(), 2);
}

#[tokio::test]
async fn test_invalid_cached_file_is_replaced() {
    let harness = Harness::new(single_file_hub(), single_file_transport());
    let dest = harness.dest("org--m", "m-Q4_0.gguf");
    std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
    std::fs::write(&dest, b"short").unwrap();

    let result = assert_ok!(
        harness
            .orchestrator(None)
            .acquire(&AcquireRequest::new("org/m"), noop())
            .await
    );

    assert!(!result.from_cache);
    assert_eq!(std::fs::read(&dest).unwrap(), b"abcdef");
}

#[tokio::test]
async fn test_no_matching_file_is_not_found() {
    let hub = FakeHub::new().with_manifest("org/m", vec![RemoteFileEntry::file("README.md")]);
    let harness = Harness::new(hub, FakeTransport::new());

    let err = assert_err!(
        harness
            .orchestrator(None)
            .acquire(&AcquireRequest::new("org/m"), noop())
            .await
    );
    assert!(matches!(err, AcquireError::NotFound { .. }));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_unsafe_manifest_path_is_invalid_reference() {
    let hub = FakeHub::new().with_manifest("org/m", vec![RemoteFileEntry::file("../evil.gguf")]);
    let harness = Harness::new(hub, FakeTransport::new());

    let err = assert_err!(
        harness
            .orchestrator(None)
            .acquire(&AcquireRequest::new("org/m"), noop())
            .await
    );
    assert!(matches!(err, AcquireError::InvalidReference { .. }));
}

#[tokio::test]
async fn test_manifest_errors_propagate() {
    let hub = FakeHub::new().with_error("org/gated", AcquireError::unauthorized(401, "gated"));
    let harness = Harness::new(hub, FakeTransport::new());

    let err = assert_err!(
        harness
            .orchestrator(None)
            .acquire(&AcquireRequest::new("org/gated"), noop())
            .await
    );
    assert!(matches!(err, AcquireError::Unauthorized { status: 401, .. }));
}

#[tokio::test]
async fn test_default_token_used_when_request_has_none() {
    let mut harness = Harness::new(single_file_hub(), single_file_transport());
    harness.settings = harness.settings.clone().with_token(Some("hf_default".to_string()));
    let orchestrator = harness.orchestrator(None);

    assert_ok!(orchestrator.acquire(&AcquireRequest::new("org/m"), noop()).await);
    assert_eq!(
        harness.transport.requests()[0].bearer_token.as_deref(),
        Some("hf_default")
    );
}

#[tokio::test]
async fn test_declared_hash_checked_once() {
    let hub = FakeHub::new().with_manifest(
        "org/m",
        vec![
            RemoteFileEntry::file("m.gguf")
                .with_size(6)
                .with_hash(ContentHash::sha256(ABCDEF_SHA256)),
        ],
    );
    let transport =
        FakeTransport::new().with_object(&FakeHub::url("org/m", "main", "m.gguf"), b"abcdef".to_vec());
    let harness = Harness::new(hub, transport);

    let result = assert_ok!(
        harness
            .orchestrator(None)
            .acquire(&AcquireRequest::new("org/m"), noop())
            .await
    );
    assert!(!result.from_cache);
}

#[tokio::test]
async fn test_system_backend_used_when_preferred() {
    let harness = Harness::new(single_file_hub(), single_file_transport());

    let mut service = MockSystemService::new();
    service.expect_is_available().return_const(true);
    service.expect_enqueue().times(1).returning(|request| {
        std::fs::write(&request.destination, b"abcdef").unwrap();
        Ok(SystemJobId(1))
    });
    service
        .expect_status()
        .returning(|_| Ok(SystemJobStatus::Succeeded { downloaded_bytes: 6 }));
    service.expect_remove().returning(|_| Ok(()));

    let result = assert_ok!(
        harness
            .orchestrator(Some(service))
            .acquire(
                &AcquireRequest::new("org/m").prefer_system_backend(true),
                noop()
            )
            .await
    );

    assert!(!result.from_cache);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn test_system_failure_falls_back_to_streaming() {
    let harness = Harness::new(single_file_hub(), single_file_transport());

    let mut service = MockSystemService::new();
    service.expect_is_available().return_const(true);
    service.expect_enqueue().returning(|_| {
        Err(AcquireError::SystemBackend {
            reason_code: 7,
            message: "failed to connect".to_string(),
        })
    });

    let result = assert_ok!(
        harness
            .orchestrator(Some(service))
            .acquire(
                &AcquireRequest::new("org/m").prefer_system_backend(true),
                noop()
            )
            .await
    );

    assert!(!result.from_cache);
    assert_eq!(harness.transport.requests().len(), 1);
}

#[tokio::test]
async fn test_unavailable_system_backend_is_skipped() {
    let harness = Harness::new(single_file_hub(), single_file_transport());

    let mut service = MockSystemService::new();
    service.expect_is_available().return_const(false);
    service.expect_enqueue().never();

    assert_ok!(
        harness
            .orchestrator(Some(service))
            .acquire(
                &AcquireRequest::new("org/m").prefer_system_backend(true),
                noop()
            )
            .await
    );
    assert_eq!(harness.transport.requests().len(), 1);
}

#[tokio::test]
async fn test_cancel_during_system_backend_does_not_fall_through() {
    let harness = Harness::new(single_file_hub(), single_file_transport());

    let polls = Arc::new(AtomicUsize::new(0));
    let mut service = MockSystemService::new();
    service.expect_is_available().return_const(true);
    service.expect_enqueue().returning(|_| Ok(SystemJobId(9)));
    let counter = Arc::clone(&polls);
    service.expect_status().returning(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(SystemJobStatus::Pending)
    });
    service.expect_remove().times(1).returning(|_| Ok(()));
    let orchestrator = Arc::new(harness.orchestrator(Some(service)));

    let task = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .acquire(
                    &AcquireRequest::new("org/m").prefer_system_backend(true),
                    noop(),
                )
                .await
        })
    };

    while polls.load(Ordering::SeqCst) == 0 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    orchestrator.cancel();

    let err = task.await.unwrap().unwrap_err();
    assert!(err.is_cancelled());
    assert!(harness.transport.requests().is_empty());

    // The next call runs under a fresh session.
    let result = assert_ok!(orchestrator.acquire(&AcquireRequest::new("org/m"), noop()).await);
    assert!(!result.from_cache);
}

#[tokio::test]
async fn test_cancel_with_nothing_in_flight_is_harmless() {
    let harness = Harness::new(single_file_hub(), single_file_transport());
    let orchestrator = harness.orchestrator(None);

    orchestrator.cancel();
    assert_ok!(orchestrator.acquire(&AcquireRequest::new("org/m"), noop()).await);
}

#[tokio::test]
async fn test_bundle_skips_unconfigured_roles() {
    let hub = single_file_hub().with_manifest(
        "org/vae",
        vec![RemoteFileEntry::file("vae/model.safetensors").with_size(3)],
    );
    let transport = single_file_transport().with_object(
        &FakeHub::url("org/vae", "main", "vae/model.safetensors"),
        b"vae".to_vec(),
    );
    let harness = Harness::new(hub, transport);
    let bundle = BundleDescriptor::new("demo", "demo", FileRef::quantized("org/m", "gguf", ["Q4_0"]))
        .with_auxiliary(
            BundleRole::Vae,
            Some(FileRef::generic_file("org/vae", "vae/model.safetensors")),
        )
        .with_auxiliary(BundleRole::ClipVision, None);

    let result = assert_ok!(
        harness
            .orchestrator(None)
            .acquire_bundle(&bundle, &AcquireOptions::default(), noop())
            .await
    );

    assert_eq!(result.bundle_id, "demo");
    assert_eq!(result.skipped, vec![BundleRole::ClipVision]);
    let vae = &result.auxiliary[&BundleRole::Vae];
    assert_eq!(
        vae.local_file,
        harness.dest("org--vae", "vae/model.safetensors")
    );
}

#[tokio::test]
async fn test_bundle_with_unresolvable_role_is_incomplete() {
    let hub = single_file_hub().with_manifest("org/enc", vec![RemoteFileEntry::file("other.gguf")]);
    let harness = Harness::new(hub, single_file_transport());
    let bundle = BundleDescriptor::new("demo", "demo", FileRef::quantized("org/m", "gguf", ["Q4_0"]))
        .with_auxiliary(
            BundleRole::TextEncoder,
            Some(FileRef::generic_file("org/enc", "encoder.gguf")),
        );

    let err = assert_err!(
        harness
            .orchestrator(None)
            .acquire_bundle(&bundle, &AcquireOptions::default(), noop())
            .await
    );
    assert!(matches!(
        err,
        AcquireError::BundleIncomplete { ref role, .. } if role == "text_encoder"
    ));
}

#[tokio::test]
async fn test_unknown_bundle_id() {
    let harness = Harness::new(FakeHub::new(), FakeTransport::new());
    let err = assert_err!(
        harness
            .orchestrator(None)
            .acquire_bundle_by_id("nope", &AcquireOptions::default(), noop())
            .await
    );
    assert!(matches!(err, AcquireError::NotFound { .. }));
}

#[tokio::test]
async fn test_list_and_clear_cache() {
    let harness = Harness::new(single_file_hub(), single_file_transport());
    let orchestrator = harness.orchestrator(None);

    assert!(assert_ok!(orchestrator.list_cached_models().await).is_empty());

    assert_ok!(orchestrator.acquire(&AcquireRequest::new("org/m"), noop()).await);
    let models = assert_ok!(orchestrator.list_cached_models().await);
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name, "org--m");
    assert_eq!(models[0].revisions, vec!["main".to_string()]);
    assert_eq!(models[0].size_bytes, 6);

    assert_ok!(orchestrator.clear_cache().await);
    assert!(!harness.settings.cache_root.exists());
    assert_ok!(orchestrator.clear_cache().await);
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = EngineSettings::new("/tmp/cache").with_chunk_size(1);
    let result = AcquisitionOrchestrator::new(
        &settings,
        OrchestratorDeps {
            hub: Arc::new(FakeHub::new()),
            transport: Arc::new(FakeTransport::new()),
            system_service: None,
            aliases: AliasTable::new(),
            registry: ModelRegistry::new(),
        },
    );
    assert!(matches!(result, Err(AcquireError::Configuration { .. })));
}
