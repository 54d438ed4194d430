//! On-disk cache layout.
//!
//! `<cache_root>/<sanitized model id>/<encoded revision>/<relative path>`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Separator substituted for `/` and `\` in model ids.
const ID_SEPARATOR: &str = "--";

/// Turn a hub model id into a single directory name.
///
/// `owner/name` becomes `owner--name`. Path separators and `:` never survive,
/// and the reserved names `.`/`..` are prefixed so the result cannot escape
/// the cache root.
pub fn sanitize_model_id(model_id: &str) -> String {
    let sanitized = model_id
        .trim()
        .replace(['/', '\\'], ID_SEPARATOR)
        .replace(':', "_");
    match sanitized.as_str() {
        "" | "." | ".." => format!("_{sanitized}"),
        _ => sanitized,
    }
}

/// Percent-encode a revision for use as a directory name.
///
/// Branch names like `refs/pr/1` become `refs%2Fpr%2F1`, so a revision never
/// creates nested or escaping directories.
pub fn revision_dir_name(revision: &str) -> String {
    let mut out = String::with_capacity(revision.len());
    for b in revision.as_bytes() {
        match *b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(*b));
            }
            b => {
                let _ = write!(&mut out, "%{b:02X}");
            }
        }
    }
    match out.as_str() {
        "" => "_".to_string(),
        "." | ".." => out.replace('.', "%2E"),
        _ => out,
    }
}

/// Check that a repository-relative path stays inside its directory.
///
/// Rejects absolute paths and `.`, `..` or empty components.
pub fn validate_relative_path(relative: &str) -> Result<(), PathError> {
    let unsafe_path = |reason: &str| PathError::UnsafeRelativePath {
        path: relative.to_string(),
        reason: reason.to_string(),
    };

    if relative.starts_with('/') || relative.starts_with('\\') {
        return Err(unsafe_path("absolute paths are not allowed"));
    }
    for component in relative.split(['/', '\\']) {
        match component {
            "" => return Err(unsafe_path("empty path component")),
            "." | ".." => return Err(unsafe_path("relative components are not allowed")),
            c if c.contains(':') && cfg!(windows) => {
                return Err(unsafe_path("drive prefixes are not allowed"));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Directory holding every revision of `model_id`.
pub fn model_dir(cache_root: &Path, model_id: &str) -> PathBuf {
    cache_root.join(sanitize_model_id(model_id))
}

/// Final destination of one file in the cache.
pub fn destination_path(
    cache_root: &Path,
    model_id: &str,
    revision: &str,
    relative: &str,
) -> Result<PathBuf, PathError> {
    validate_relative_path(relative)?;
    let mut path = model_dir(cache_root, model_id).join(revision_dir_name(revision));
    for component in relative.split('/') {
        path.push(component);
    }
    Ok(path)
}

/// Create the parent directory of `file` (recursively) if it is missing.
pub fn ensure_parent_dir(file: &Path) -> Result<(), PathError> {
    let Some(parent) = file.parent() else {
        return Ok(());
    };
    if parent.exists() {
        if !parent.is_dir() {
            return Err(PathError::NotADirectory(parent.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| PathError::CreateFailed {
        path: parent.to_path_buf(),
        reason: e.to_string(),
    })
}
