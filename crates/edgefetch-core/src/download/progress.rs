//! Progress reporting contract shared by both transfer backends.

use std::sync::Arc;

/// Progress callback: `(downloaded_bytes, total_bytes)`.
///
/// Invoked from the transfer task after every chunk (streaming) or every poll
/// tick (system backend). Implementations must not block; redispatching to a
/// UI thread is the caller's concern.
pub type ProgressCallback = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// A callback that discards every update.
#[must_use]
pub fn noop_progress() -> ProgressCallback {
    Arc::new(|_, _| {})
}
