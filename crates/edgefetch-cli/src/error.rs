//! CLI-specific error types and mappings.
//!
//! Maps acquisition failures to exit codes and user-facing messages.

use edgefetch_core::{AcquireError, PathError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Acquisition engine error.
    #[error("{}", .0.user_message())]
    Acquire(#[from] AcquireError),

    /// Argument or usage error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    /// - 130: Interrupted (Ctrl-C)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Acquire(err) => acquire_exit_code(err),
            CliError::Arguments(_) => 2,
            CliError::Io(_) => 74,     // EX_IOERR
            CliError::Config(_) => 78, // EX_CONFIG
        }
    }
}

fn acquire_exit_code(err: &AcquireError) -> i32 {
    match err {
        AcquireError::Cancelled => 130,
        AcquireError::InvalidReference { .. } => 65, // EX_DATAERR
        AcquireError::NotFound { .. } | AcquireError::BundleIncomplete { .. } => 66, // EX_NOINPUT
        AcquireError::Unauthorized { .. } => 77, // EX_NOPERM
        AcquireError::Configuration { .. } => 78, // EX_CONFIG
        AcquireError::OutOfResource { .. } => 71, // EX_OSERR
        AcquireError::SizeMismatch { .. } | AcquireError::HashMismatch { .. } => 74, // EX_IOERR
        other if other.is_recoverable() => 75, // EX_TEMPFAIL
        _ => 1,
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}
