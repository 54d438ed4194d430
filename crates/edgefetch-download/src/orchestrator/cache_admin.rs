//! Cache inspection and removal.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use edgefetch_core::download::{AcquireError, AcquireResult, CachedModel};
use tracing::info;

use super::AcquisitionOrchestrator;

impl AcquisitionOrchestrator {
    /// One entry per model directory under the cache root, sorted by name.
    ///
    /// A missing cache root yields an empty list.
    pub async fn list_cached_models(&self) -> AcquireResult<Vec<CachedModel>> {
        let root = self.settings.cache_root.clone();
        tokio::task::spawn_blocking(move || scan_cache(&root))
            .await
            .map_err(|e| AcquireError::transient("Other", format!("cache scan failed: {e}")))?
    }

    /// Remove the whole cache tree. A missing root is not an error.
    pub async fn clear_cache(&self) -> AcquireResult<()> {
        match tokio::fs::remove_dir_all(&self.settings.cache_root).await {
            Ok(()) => {
                info!(root = %self.settings.cache_root.display(), "Cleared cache");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn scan_cache(root: &Path) -> AcquireResult<Vec<CachedModel>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut models = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let mut revisions: Vec<String> = fs::read_dir(&path)?
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        revisions.sort();

        models.push(CachedModel {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: dir_size(&path)?,
            path,
            revisions,
        });
    }

    models.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(models)
}

fn dir_size(dir: &Path) -> AcquireResult<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            total += dir_size(&entry.path())?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}
