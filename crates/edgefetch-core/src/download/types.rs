//! Core domain types for acquisition.
//!
//! Pure data types; the only I/O is the `stat` in [`FileMetadata::from_path`].

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default revision used when the caller does not name one.
pub const DEFAULT_REVISION: &str = "main";

/// Suffix of the reserved sibling file that holds partial bytes.
pub const PARTIAL_SUFFIX: &str = ".part";

// ============================================================================
// Model Reference
// ============================================================================

/// A user-supplied model reference after alias resolution.
///
/// Created per call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReference {
    /// The id exactly as the caller supplied it.
    pub requested_id: String,
    /// The revision exactly as the caller supplied it (`main` if omitted).
    pub requested_revision: String,
    /// Canonical hub id used for every network call.
    pub resolved_id: String,
    /// Revision used for every network call.
    pub resolved_revision: String,
    /// Whether an alias table entry replaced the id or revision.
    pub alias_applied: bool,
}

impl fmt::Display for ModelReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.resolved_id, self.resolved_revision)
    }
}

// ============================================================================
// Manifest Entries
// ============================================================================

/// Kind of entry in a remote manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// The listing omitted the kind; treated as a file.
    #[default]
    Unspecified,
}

impl EntryKind {
    /// Whether entries of this kind can be downloaded.
    #[must_use]
    pub const fn is_file_like(self) -> bool {
        matches!(self, Self::File | Self::Unspecified)
    }
}

/// Hash algorithm of a declared content hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, as used by large-file storage object ids.
    Sha256,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Length of a hex digest for this algorithm.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
        }
    }

    /// Parse an algorithm name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared content hash: algorithm plus lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub hex: String,
}

impl ContentHash {
    /// Create a SHA-256 hash from a hex digest (normalized to lowercase).
    pub fn sha256(hex: impl AsRef<str>) -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            hex: hex.as_ref().trim().to_ascii_lowercase(),
        }
    }

    /// Parse a declared hash, normalizing an optional `algorithm:` prefix.
    ///
    /// Without a prefix the value is accepted as SHA-256 when it has the
    /// right length. Returns `None` for unknown algorithms or non-hex digests.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (algorithm, hex) = match value.split_once(':') {
            Some((prefix, hex)) => (HashAlgorithm::parse(prefix)?, hex.trim()),
            None if value.len() == HashAlgorithm::Sha256.hex_len() => {
                (HashAlgorithm::Sha256, value)
            }
            None => return None,
        };

        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        Some(Self {
            algorithm,
            hex: hex.to_ascii_lowercase(),
        })
    }

    /// Compare against a computed hex digest, case-insensitively.
    #[must_use]
    pub fn matches(&self, actual_hex: &str) -> bool {
        self.hex.eq_ignore_ascii_case(actual_hex.trim())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

/// One entry of a remote manifest.
///
/// Transient: re-fetched on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    /// Path relative to the repository root (`/`-separated).
    pub relative_path: String,
    /// Declared size in bytes, if the listing carries one.
    pub size_bytes: Option<u64>,
    /// Declared content hash, if the listing carries one.
    pub content_hash: Option<ContentHash>,
    /// Entry kind.
    pub entry_kind: EntryKind,
}

impl RemoteFileEntry {
    /// Create a file entry with no size or hash.
    pub fn file(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            size_bytes: None,
            content_hash: None,
            entry_kind: EntryKind::File,
        }
    }

    /// Set the declared size.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }

    /// Set the declared hash.
    #[must_use]
    pub fn with_hash(mut self, hash: ContentHash) -> Self {
        self.content_hash = Some(hash);
        self
    }

    /// Set the entry kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: EntryKind) -> Self {
        self.entry_kind = kind;
        self
    }

    /// Last path component.
    #[must_use]
    pub fn filename(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Whether the path ends with `extension` (with or without a leading dot),
    /// compared case-insensitively.
    #[must_use]
    pub fn has_extension(&self, extension: &str) -> bool {
        let wanted = extension.trim_start_matches('.');
        Path::new(&self.relative_path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Which fallback a selection uses when neither filename nor tokens match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Pick one weight file among quantization variants; fallback is the smallest.
    #[default]
    Quantized,
    /// Pick the main file of a single-artifact repository; fallback is the largest.
    Generic,
}

/// Criteria for choosing one manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCriteria {
    /// Exact filename or path suffix requested by the caller.
    pub explicit_filename: Option<String>,
    /// Substrings tried in order (e.g., `Q4_K_M`).
    pub ordered_variant_tokens: Vec<String>,
    /// Extensions a candidate must carry (e.g., `gguf`).
    pub allowed_extensions: Vec<String>,
}

impl SelectionCriteria {
    /// Criteria accepting the given extensions, with no hints.
    pub fn for_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            explicit_filename: None,
            ordered_variant_tokens: Vec::new(),
            allowed_extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Set the explicit filename.
    #[must_use]
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.explicit_filename = filename;
        self
    }

    /// Set the ordered variant tokens.
    #[must_use]
    pub fn with_variants(mut self, tokens: Vec<String>) -> Self {
        self.ordered_variant_tokens = tokens;
        self
    }
}

// ============================================================================
// Transfer
// ============================================================================

/// A single in-flight transfer.
///
/// Lives from request start until rename-to-final (success) or deletion
/// (any failure or cancellation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Resolve URL of the remote object.
    pub source_url: String,
    /// Final destination path.
    pub destination_path: PathBuf,
    /// Reserved `<filename>.part` sibling holding partial bytes.
    pub temporary_path: PathBuf,
    /// Bytes already present in the temporary file when the request was made.
    pub resume_offset_bytes: u64,
    /// Size declared by the manifest.
    pub expected_size_bytes: Option<u64>,
    /// Hash declared by the manifest.
    pub expected_hash: Option<ContentHash>,
}

impl DownloadTarget {
    /// Create a target for `destination`, deriving its temporary path.
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        let destination_path = destination.into();
        let temporary_path = partial_path_for(&destination_path);
        Self {
            source_url: source_url.into(),
            destination_path,
            temporary_path,
            resume_offset_bytes: 0,
            expected_size_bytes: None,
            expected_hash: None,
        }
    }

    /// Set the expected size.
    #[must_use]
    pub const fn with_expected_size(mut self, size: Option<u64>) -> Self {
        self.expected_size_bytes = size;
        self
    }

    /// Set the expected hash.
    #[must_use]
    pub fn with_expected_hash(mut self, hash: Option<ContentHash>) -> Self {
        self.expected_hash = hash;
        self
    }
}

/// Path of the reserved partial-bytes sibling for `destination`.
#[must_use]
pub fn partial_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    destination.with_file_name(name)
}

// ============================================================================
// Results
// ============================================================================

/// Filesystem metadata of an acquired file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Length in bytes.
    pub size_bytes: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
}

impl FileMetadata {
    /// Read metadata for `path`.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            size_bytes: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}

/// Outcome of a successful acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Reference that was acquired.
    pub reference: ModelReference,
    /// Path of the verified file in the cache.
    pub local_file: PathBuf,
    /// Metadata of the verified file.
    pub file_metadata: FileMetadata,
    /// Whether the file was already valid and no transfer happened.
    pub from_cache: bool,
    /// Whether an alias replaced the requested id.
    pub alias_applied: bool,
}

/// One model directory found under the cache root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedModel {
    /// Sanitized directory name.
    pub name: String,
    /// Absolute directory path.
    pub path: PathBuf,
    /// Revision directories present.
    pub revisions: Vec<String>,
    /// Total bytes of all files below the directory.
    pub size_bytes: u64,
}
