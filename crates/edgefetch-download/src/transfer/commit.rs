//! Verify-then-rename shared by both backends.

use std::io::ErrorKind;
use std::path::Path;

use edgefetch_core::download::{AcquireError, AcquireResult, DownloadTarget};
use tracing::{debug, warn};

use crate::cache::CacheValidator;

/// Check the finished `.part` file and move it to the destination.
///
/// Returns whether a hash was checked. The `.part` file is deleted on any
/// failure.
pub(crate) async fn verify_and_commit(
    validator: &CacheValidator,
    target: &DownloadTarget,
) -> AcquireResult<bool> {
    let hash_checked = match validator
        .verify(
            &target.temporary_path,
            target.expected_size_bytes,
            target.expected_hash.as_ref(),
        )
        .await
    {
        Ok(checked) => checked,
        Err(e) => {
            remove_quietly(&target.temporary_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&target.temporary_path, &target.destination_path).await {
        remove_quietly(&target.temporary_path).await;
        return Err(AcquireError::commit(
            target.destination_path.display().to_string(),
            e.to_string(),
        ));
    }

    debug!(
        file = %target.destination_path.display(),
        hash_checked,
        "Committed download"
    );
    Ok(hash_checked)
}

/// Delete a file, ignoring "not found" and logging anything else.
pub(crate) async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove file"),
    }
}
