//! Path-related error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::download::AcquireError;

/// Errors that can occur during cache path resolution and layout.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Could not determine the platform cache directory.
    #[error("Cannot determine system cache directory")]
    NoCacheDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// A repository-relative path would escape its revision directory.
    #[error("Unsafe relative path '{path}': {reason}")]
    UnsafeRelativePath { path: String, reason: String },

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}

impl From<PathError> for AcquireError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::UnsafeRelativePath { .. } => Self::invalid_reference(err.to_string()),
            PathError::CreateFailed { path, reason } => Self::transient(
                "CreateDir",
                format!("failed to create {}: {reason}", path.display()),
            ),
            other => Self::configuration(other.to_string()),
        }
    }
}
