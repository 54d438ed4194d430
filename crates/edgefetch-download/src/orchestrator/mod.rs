//! Acquisition orchestrator.
//!
//! The public operation surface: `acquire`, `acquire_bundle`,
//! `list_cached_models`, `clear_cache` and `cancel`.
//!
//! # Flow of `acquire`
//!
//! 1. Resolve the reference, fetch the manifest and select one entry.
//! 2. Return the cached file when it validates (unless forced).
//! 3. Try the system backend when asked for and available; any failure other
//!    than cancellation falls through.
//! 4. Stream the file when it still does not exist.
//! 5. Re-check size, and the hash unless the backend already did.

mod bundle;
mod cache_admin;
mod locks;
mod request;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use edgefetch_core::download::{
    AcquireError, AcquireResult, DownloadResult, DownloadTarget, FileMetadata, ModelReference,
    ProgressCallback, RemoteFileEntry,
};
use edgefetch_core::paths::{destination_path, ensure_parent_dir};
use edgefetch_core::ports::{HubClientPort, SystemDownloadService};
use edgefetch_core::settings::EngineSettings;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::CacheValidator;
use crate::reference::{AliasTable, ModelReferenceResolver};
use crate::registry::ModelRegistry;
use crate::selector::FileSelector;
use crate::transfer::{
    HttpTransport, StreamingDownloader, SystemDownloadBridge, TransferBackend, TransferOutcome,
    remove_quietly,
};

use locks::DestinationLocks;
pub use request::{AcquireOptions, AcquireRequest};

/// Collaborators of the orchestrator.
pub struct OrchestratorDeps {
    /// Manifest source.
    pub hub: Arc<dyn HubClientPort>,
    /// Transport for the streaming backend.
    pub transport: Arc<dyn HttpTransport>,
    /// OS-managed download facility, if the host has one.
    pub system_service: Option<Arc<dyn SystemDownloadService>>,
    /// Alias table.
    pub aliases: AliasTable,
    /// Bundle catalog.
    pub registry: ModelRegistry,
}

/// Turns model references into verified files in the cache.
pub struct AcquisitionOrchestrator {
    settings: EngineSettings,
    hub: Arc<dyn HubClientPort>,
    resolver: ModelReferenceResolver,
    registry: ModelRegistry,
    validator: CacheValidator,
    streaming: StreamingDownloader,
    system: Option<SystemDownloadBridge>,
    locks: DestinationLocks,
    session: Mutex<CancellationToken>,
}

impl AcquisitionOrchestrator {
    /// Validate `settings` and wire the backends.
    pub fn new(settings: &EngineSettings, deps: OrchestratorDeps) -> AcquireResult<Self> {
        settings
            .validate()
            .map_err(|e| AcquireError::configuration(e.to_string()))?;

        let streaming = StreamingDownloader::new(deps.transport, settings);
        let system = deps
            .system_service
            .map(|service| SystemDownloadBridge::new(service, settings.poll_interval));

        Ok(Self {
            settings: settings.clone(),
            hub: deps.hub,
            resolver: ModelReferenceResolver::new(deps.aliases),
            registry: deps.registry,
            validator: CacheValidator::new(),
            streaming,
            system,
            locks: DestinationLocks::new(),
            session: Mutex::new(CancellationToken::new()),
        })
    }

    /// Directory holding every cached model.
    pub fn cache_root(&self) -> &Path {
        &self.settings.cache_root
    }

    /// Bundle catalog.
    pub const fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Reference resolver.
    pub const fn resolver(&self) -> &ModelReferenceResolver {
        &self.resolver
    }

    /// Cancel every in-flight call. Later calls are unaffected.
    ///
    /// Safe to call with nothing in flight.
    pub fn cancel(&self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        session.cancel();
        *session = CancellationToken::new();
        info!("Cancelled in-flight acquisitions");
    }

    fn call_token(&self) -> CancellationToken {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .child_token()
    }

    /// Acquire one file.
    pub async fn acquire(
        &self,
        request: &AcquireRequest,
        progress: ProgressCallback,
    ) -> AcquireResult<DownloadResult> {
        let cancel = self.call_token();
        self.acquire_with(request, &progress, &cancel).await
    }

    async fn acquire_with(
        &self,
        request: &AcquireRequest,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<DownloadResult> {
        let reference = self
            .resolver
            .resolve(&request.model_id, request.revision.as_deref())?;
        let token = request
            .options
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.settings.token.as_deref());

        debug!(
            model_id = %reference.resolved_id,
            revision = %reference.resolved_revision,
            alias = reference.alias_applied,
            "Resolved model reference"
        );

        let manifest = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(AcquireError::Cancelled),
            manifest = self.hub.fetch_manifest(
                &reference.resolved_id,
                &reference.resolved_revision,
                token,
            ) => manifest?,
        };

        let entry = FileSelector::new(request.mode)
            .select(&manifest, &request.criteria())
            .cloned()
            .ok_or_else(|| no_match_error(&reference, request, &manifest))?;

        let destination = destination_path(
            &self.settings.cache_root,
            &reference.resolved_id,
            &reference.resolved_revision,
            &entry.relative_path,
        )?;

        let _guard = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(AcquireError::Cancelled),
            guard = self.locks.lock(&destination) => guard,
        };

        if !request.options.force_refresh
            && self
                .validator
                .is_valid(&destination, entry.size_bytes, entry.content_hash.as_ref())
                .await
        {
            info!(
                model_id = %reference.resolved_id,
                file = %entry.relative_path,
                "Using cached file"
            );
            return finish(reference, destination, true);
        }

        let target = DownloadTarget::new(
            self.hub.file_url(
                &reference.resolved_id,
                &reference.resolved_revision,
                &entry.relative_path,
            ),
            destination.clone(),
        )
        .with_expected_size(entry.size_bytes)
        .with_expected_hash(entry.content_hash.clone());

        self.prepare_destination(&target, request.options.force_refresh)
            .await?;

        info!(
            model_id = %reference.resolved_id,
            file = %entry.relative_path,
            bytes = ?entry.size_bytes,
            "Downloading file"
        );

        let outcome = self
            .run_backends(&target, token, request.options.prefer_system_backend, progress, cancel)
            .await?;

        self.post_verify(&target, outcome).await?;

        finish(reference, destination, false)
    }

    /// Remove what an earlier attempt left at the destination.
    async fn prepare_destination(&self, target: &DownloadTarget, force: bool) -> AcquireResult<()> {
        if tokio::fs::try_exists(&target.destination_path).await? {
            debug!(file = %target.destination_path.display(), "Removing stale destination");
            tokio::fs::remove_file(&target.destination_path).await?;
        }
        if force {
            remove_quietly(&target.temporary_path).await;
        }
        ensure_parent_dir(&target.destination_path)?;
        Ok(())
    }

    async fn run_backends(
        &self,
        target: &DownloadTarget,
        token: Option<&str>,
        prefer_system: bool,
        progress: &ProgressCallback,
        cancel: &CancellationToken,
    ) -> AcquireResult<TransferOutcome> {
        if prefer_system {
            if let Some(system) = self.system.as_ref().filter(|s| s.is_available()) {
                match system.transfer(target, token, progress, cancel).await {
                    Ok(outcome) => return Ok(outcome),
                    Err(AcquireError::Cancelled) => return Err(AcquireError::Cancelled),
                    Err(e) => warn!(
                        backend = system.name(),
                        error = %e,
                        "System download failed; falling back to streaming"
                    ),
                }
            }
        }

        if tokio::fs::try_exists(&target.destination_path).await? {
            return Ok(TransferOutcome {
                bytes_transferred: 0,
                resumed_from: 0,
                hash_verified: false,
            });
        }

        self.streaming
            .transfer(target, token, progress, cancel)
            .await
    }

    /// Size is a hard check; a failed re-hash is only fatal on mismatch.
    async fn post_verify(
        &self,
        target: &DownloadTarget,
        outcome: TransferOutcome,
    ) -> AcquireResult<()> {
        let path = &target.destination_path;

        if let Some(expected) = target.expected_size_bytes {
            if let Err(e) = self.validator.verify_size(path, expected).await {
                remove_quietly(path).await;
                return Err(e);
            }
        }

        if outcome.hash_verified {
            return Ok(());
        }
        let Some(expected) = target.expected_hash.as_ref() else {
            return Ok(());
        };

        match self.validator.verify_hash(path, expected).await {
            Ok(()) => Ok(()),
            Err(e @ AcquireError::HashMismatch { .. }) => {
                remove_quietly(path).await;
                Err(e)
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Could not hash downloaded file");
                Ok(())
            }
        }
    }
}

fn finish(
    reference: ModelReference,
    local_file: PathBuf,
    from_cache: bool,
) -> AcquireResult<DownloadResult> {
    let file_metadata = FileMetadata::from_path(&local_file)?;
    let alias_applied = reference.alias_applied;
    Ok(DownloadResult {
        reference,
        local_file,
        file_metadata,
        from_cache,
        alias_applied,
    })
}

fn no_match_error(
    reference: &ModelReference,
    request: &AcquireRequest,
    manifest: &[RemoteFileEntry],
) -> AcquireError {
    let what = request.filename.as_deref().map_or_else(
        || format!("no .{} file", request.extensions.join("/.")),
        |name| format!("no file matching '{name}'"),
    );
    AcquireError::not_found(format!(
        "{what} in {reference} ({} entries listed)",
        manifest.len()
    ))
}

#[cfg(test)]
mod tests;
