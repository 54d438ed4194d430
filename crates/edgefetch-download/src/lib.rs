//! Acquisition engine for edgefetch.
//!
//! Turns a model reference into a verified file in the local cache:
//!
//! - `reference` - alias resolution and id normalization
//! - `registry` - catalog of multi-file bundles
//! - `selector` - picks one manifest entry
//! - `cache` - validates files already on disk
//! - `transfer` - streaming and system-facility transfer backends
//! - `system` - `curl`-process implementation of the system download service
//! - `orchestrator` - the public operation surface

// Re-export core types for convenience
pub use edgefetch_core::download::{
    AcquireError, AcquireResult, BundleDescriptor, BundleResult, BundleRole, CachedModel,
    DownloadResult, FileRef, ModelReference, ProgressCallback, SelectionCriteria, SelectionMode,
};

mod cache;
mod orchestrator;
mod progress;
mod reference;
mod registry;
mod selector;
mod system;
mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheValidator, hash_file};
pub use orchestrator::{AcquireOptions, AcquireRequest, AcquisitionOrchestrator, OrchestratorDeps};
pub use progress::{ProgressThrottle, throttled};
pub use reference::{AliasEntry, AliasTable, ModelReferenceResolver};
pub use registry::ModelRegistry;
pub use selector::{DEFAULT_VARIANT_PREFERENCE, FileSelector};
pub use system::CurlDownloadService;
pub use transfer::{
    ByteStream, HttpTransport, ReqwestTransport, StreamingDownloader, SystemDownloadBridge,
    TransferBackend, TransferOutcome, TransferRequest, TransferResponse,
};
