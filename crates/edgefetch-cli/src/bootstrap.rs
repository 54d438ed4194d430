//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the CLI wires concrete adapters into
//! the acquisition engine:
//! - Hub manifest client (via edgefetch-hf)
//! - Streaming transport and curl-backed system download service (via edgefetch-download)
//! - Built-in alias table and bundle catalog
//!
//! Command handlers receive the composed [`CliContext`].

use std::sync::Arc;

use edgefetch_core::ports::{HubClientPort, SystemDownloadService};
use edgefetch_core::{CacheRootResolution, EngineSettings, resolve_cache_root};
use edgefetch_download::{
    AcquisitionOrchestrator, AliasTable, CurlDownloadService, HttpTransport, ModelRegistry,
    OrchestratorDeps, ReqwestTransport,
};
use edgefetch_hf::{DefaultHfClient, HfClientConfig};
use tracing::debug;

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Explicit cache root (`--cache-dir`).
    pub cache_dir: Option<String>,
    /// Hub host override (`--hub-url`), e.g. a mirror.
    pub hub_url: Option<String>,
}

impl CliConfig {
    /// Config that resolves the cache root from the environment.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Config with an optional explicit cache root.
    pub fn with_cache_dir(cache_dir: Option<String>) -> Self {
        Self {
            cache_dir,
            ..Self::default()
        }
    }

    /// Override the hub host.
    #[must_use]
    pub fn with_hub_url(mut self, hub_url: Option<String>) -> Self {
        self.hub_url = hub_url.filter(|u| !u.trim().is_empty());
        self
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The acquisition engine.
    pub orchestrator: Arc<AcquisitionOrchestrator>,
    /// Where the cache root came from.
    pub cache_root: CacheRootResolution,
    /// Whether a `curl` binary was found for the system backend.
    pub system_backend_available: bool,
}

impl CliContext {
    /// Access the acquisition engine.
    pub fn orchestrator(&self) -> &AcquisitionOrchestrator {
        &self.orchestrator
    }
}

/// Bootstrap the CLI application.
///
/// 1. Resolves the cache root (`--cache-dir`, `EDGEFETCH_CACHE_DIR`, platform default)
/// 2. Builds the hub client and the HTTP transport from shared settings
/// 3. Detects `curl` for the system backend
/// 4. Assembles the orchestrator with the built-in aliases and bundles
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let cache_root = resolve_cache_root(config.cache_dir.as_deref())?;
    debug!(
        cache_root = %cache_root.path.display(),
        source = cache_root.source.label(),
        "Resolved cache root"
    );

    let mut settings = EngineSettings::new(cache_root.path.clone());
    if let Some(hub_url) = config.hub_url {
        settings = settings.with_hub_base_url(hub_url);
    }

    let hub: Arc<dyn HubClientPort> =
        Arc::new(DefaultHfClient::new(&HfClientConfig::from_settings(&settings))?);
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&settings)?);

    let curl = CurlDownloadService::new(&settings);
    let system_backend_available = curl.is_available();
    let system_service: Option<Arc<dyn SystemDownloadService>> = Some(Arc::new(curl));

    let orchestrator = AcquisitionOrchestrator::new(
        &settings,
        OrchestratorDeps {
            hub,
            transport,
            system_service,
            aliases: AliasTable::builtin(),
            registry: ModelRegistry::builtin(),
        },
    )?;

    Ok(CliContext {
        orchestrator: Arc::new(orchestrator),
        cache_root,
        system_backend_available,
    })
}
