//! Cache root resolution.
//!
//! Resolves the directory under which every acquired model lives, from an
//! explicit path, an environment variable, or the platform cache directory.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable that overrides the cache root.
pub const CACHE_DIR_ENV: &str = "EDGEFETCH_CACHE_DIR";

/// Location of the cache root relative to the platform cache directory.
pub const DEFAULT_CACHE_DIR_RELATIVE: &str = "edgefetch/models";

/// How the cache root was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRootSource {
    /// The caller passed an explicit path (e.g., `--cache-dir`).
    Explicit,
    /// The path came from `EDGEFETCH_CACHE_DIR`.
    EnvVar,
    /// Platform default.
    Default,
}

impl CacheRootSource {
    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::EnvVar => "env",
            Self::Default => "default",
        }
    }
}

/// Resolution result for the cache root.
#[derive(Debug, Clone)]
pub struct CacheRootResolution {
    /// The resolved cache root.
    pub path: PathBuf,
    /// How the path was determined.
    pub source: CacheRootSource,
}

/// Return the platform default cache root.
///
/// `<platform cache dir>/edgefetch/models`, e.g. `~/.cache/edgefetch/models`.
pub fn default_cache_root() -> Result<PathBuf, PathError> {
    let base = dirs::cache_dir().ok_or(PathError::NoCacheDir)?;
    Ok(base.join(DEFAULT_CACHE_DIR_RELATIVE))
}

/// Resolve the cache root.
///
/// Resolution order:
/// 1. Explicit path provided by caller (highest priority)
/// 2. `EDGEFETCH_CACHE_DIR` environment variable
/// 3. [`default_cache_root`]
pub fn resolve_cache_root(explicit: Option<&str>) -> Result<CacheRootResolution, PathError> {
    if let Some(path_str) = explicit {
        return Ok(CacheRootResolution {
            path: normalize_user_path(path_str)?,
            source: CacheRootSource::Explicit,
        });
    }

    if let Ok(env_path) = env::var(CACHE_DIR_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(CacheRootResolution {
                path: normalize_user_path(&env_path)?,
                source: CacheRootSource::EnvVar,
            });
        }
    }

    Ok(CacheRootResolution {
        path: default_cache_root()?,
        source: CacheRootSource::Default,
    })
}

/// Expand `~` and make a user-supplied path absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed == "~" {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        dirs::home_dir().ok_or(PathError::NoHomeDir)?.join(rest)
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
