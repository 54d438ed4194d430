//! Validation of files already on disk.
//!
//! No network access: local metadata reads plus hashing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use edgefetch_core::download::{AcquireError, AcquireResult, ContentHash};
use sha2::{Digest, Sha256};
use tracing::debug;

const HASH_BUFFER_SIZE: usize = 1024 * 1024;

/// Compute the lowercase hex SHA-256 of a file on the blocking pool.
pub async fn hash_file(path: &Path) -> AcquireResult<String> {
    let path_owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_file_blocking(&path_owned))
        .await
        .map_err(|e| AcquireError::transient("Other", format!("hashing task failed: {e}")))?
}

fn hash_file_blocking(path: &Path) -> AcquireResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Decides whether a cached file can be used as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheValidator;

impl CacheValidator {
    /// Create a validator.
    pub const fn new() -> Self {
        Self
    }

    /// Whether `path` is a usable copy of the declared object.
    ///
    /// A declared hash is authoritative regardless of size. Without a hash the
    /// declared size decides; without either, any non-empty file is valid.
    pub async fn is_valid(
        &self,
        path: &Path,
        expected_size: Option<u64>,
        expected_hash: Option<&ContentHash>,
    ) -> bool {
        let Ok(metadata) = tokio::fs::metadata(path).await else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        if let Some(expected) = expected_hash {
            return match hash_file(path).await {
                Ok(actual) => {
                    let ok = expected.matches(&actual);
                    debug!(path = %path.display(), hash_ok = ok, "Checked cached file hash");
                    ok
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Cached file unreadable");
                    false
                }
            };
        }

        match expected_size {
            Some(size) => metadata.len() == size,
            None => metadata.len() > 0,
        }
    }

    /// Fail with `SizeMismatch` unless the file has the declared length.
    pub async fn verify_size(&self, path: &Path, expected: u64) -> AcquireResult<()> {
        let actual = tokio::fs::metadata(path).await?.len();
        if actual == expected {
            Ok(())
        } else {
            Err(AcquireError::SizeMismatch {
                path: path.display().to_string(),
                expected,
                actual,
            })
        }
    }

    /// Fail with `HashMismatch` unless the file hashes to the declared value.
    ///
    /// I/O failures while hashing surface as their own error kinds.
    pub async fn verify_hash(&self, path: &Path, expected: &ContentHash) -> AcquireResult<()> {
        let actual = hash_file(path).await?;
        if expected.matches(&actual) {
            Ok(())
        } else {
            Err(AcquireError::HashMismatch {
                path: path.display().to_string(),
                expected: expected.hex.clone(),
                actual,
            })
        }
    }

    /// Strict check of a finished transfer: size first, then hash.
    ///
    /// Returns whether a hash was checked.
    pub async fn verify(
        &self,
        path: &Path,
        expected_size: Option<u64>,
        expected_hash: Option<&ContentHash>,
    ) -> AcquireResult<bool> {
        if let Some(size) = expected_size {
            self.verify_size(path, size).await?;
        }
        match expected_hash {
            Some(hash) => {
                self.verify_hash(path, hash).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
