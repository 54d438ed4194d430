//! Model hub client port trait.

use async_trait::async_trait;

use crate::download::{AcquireResult, RemoteFileEntry};

/// Port trait for the remote model hub.
///
/// The implementation lives in `edgefetch-hf`. Errors are already mapped to
/// the acquisition taxonomy: 404 becomes `NotFound`, 401/403 become
/// `Unauthorized`.
#[async_trait]
pub trait HubClientPort: Send + Sync {
    /// Fetch the file listing of `model_id` at `revision`.
    ///
    /// Entries keep the order the hub returned them in.
    async fn fetch_manifest(
        &self,
        model_id: &str,
        revision: &str,
        token: Option<&str>,
    ) -> AcquireResult<Vec<RemoteFileEntry>>;

    /// Resolve URL of one file.
    fn file_url(&self, model_id: &str, revision: &str, path: &str) -> String;
}
