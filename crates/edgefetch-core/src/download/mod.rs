//! Acquisition domain types, errors, and the progress contract.
//!
//! Pure data types. No networking or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - References, manifest entries, selection criteria, transfer targets, results
//! - `bundle` - Multi-file model descriptors (`BundleDescriptor`, `FileRef`, `BundleRole`)
//! - `errors` - Error taxonomy for acquisition (`AcquireError`)
//! - `progress` - Progress callback shared by both transfer backends

pub mod bundle;
pub mod errors;
pub mod progress;
pub mod types;

pub use bundle::{BundleDescriptor, BundleResult, BundleRole, FileRef};
pub use errors::{AcquireError, AcquireResult, ERROR_BODY_LIMIT};
pub use progress::{ProgressCallback, noop_progress};
pub use types::{
    CachedModel, ContentHash, DEFAULT_REVISION, DownloadResult, DownloadTarget, EntryKind,
    FileMetadata, HashAlgorithm, ModelReference, PARTIAL_SUFFIX, RemoteFileEntry,
    SelectionCriteria, SelectionMode, partial_path_for,
};
