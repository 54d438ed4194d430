//! Core domain types and port definitions for edgefetch.
//!
//! This crate holds everything the acquisition engine shares across adapters:
//! the data model, the error taxonomy, the progress contract, the cache layout
//! and the port traits implemented by `edgefetch-hf` and `edgefetch-download`.
//! It performs no network I/O.

#![deny(unused_crate_dependencies)]

pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use download::{
    AcquireError, AcquireResult, BundleDescriptor, BundleResult, BundleRole, CachedModel,
    ContentHash, DEFAULT_REVISION, DownloadResult, DownloadTarget, EntryKind, FileMetadata,
    FileRef, HashAlgorithm, ModelReference, PARTIAL_SUFFIX, ProgressCallback, RemoteFileEntry,
    SelectionCriteria, SelectionMode, noop_progress, partial_path_for,
};
pub use ports::{
    HubClientPort, SystemDownloadRequest, SystemDownloadService, SystemJobId, SystemJobStatus,
};
pub use settings::{EngineSettings, SettingsError};

// Re-export path utilities
pub use paths::{
    CACHE_DIR_ENV, CacheRootResolution, CacheRootSource, PathError, default_cache_root,
    destination_path, ensure_parent_dir, model_dir, resolve_cache_root, revision_dir_name,
    sanitize_model_id, validate_relative_path,
};
