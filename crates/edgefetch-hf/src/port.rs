//! `HubClientPort` implementation for `HfClient`.
//!
//! Maps internal `HfError`s to the acquisition error taxonomy.

use async_trait::async_trait;
use edgefetch_core::{AcquireError, AcquireResult, HubClientPort, RemoteFileEntry};

use crate::client::HfClient;
use crate::error::HfError;
use crate::http::HttpBackend;
use crate::models::HfRepoRef;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert an internal `HfError` to an `AcquireError`.
fn map_error(err: HfError, model_id: &str, revision: &str) -> AcquireError {
    match err {
        HfError::ApiRequestFailed { status: 404, .. } => AcquireError::not_found(format!(
            "no manifest for model '{model_id}' at revision '{revision}'"
        )),
        HfError::ApiRequestFailed {
            status: status @ (401 | 403),
            ..
        } => AcquireError::unauthorized(
            status,
            format!("hub refused access to model '{model_id}'"),
        ),
        HfError::ApiRequestFailed { status, url } => AcquireError::http(status, url),
        HfError::InvalidRepoId { model_id } => {
            AcquireError::invalid_reference(format!("'{model_id}' is not a valid repository id"))
        }
        HfError::Network(e) => {
            let kind = if e.is_timeout() {
                "TimedOut"
            } else if e.is_connect() {
                "ConnectionRefused"
            } else {
                "Network"
            };
            AcquireError::transient(kind, e.to_string())
        }
        HfError::InvalidResponse { message } => AcquireError::transient("InvalidData", message),
        HfError::JsonParse(e) => AcquireError::transient("InvalidData", e.to_string()),
        HfError::InvalidUrl(e) => AcquireError::configuration(e.to_string()),
    }
}

// ============================================================================
// HubClientPort Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + 'static> HubClientPort for HfClient<B> {
    async fn fetch_manifest(
        &self,
        model_id: &str,
        revision: &str,
        token: Option<&str>,
    ) -> AcquireResult<Vec<RemoteFileEntry>> {
        let repo = HfRepoRef::parse(model_id).ok_or_else(|| {
            map_error(
                HfError::InvalidRepoId {
                    model_id: model_id.to_string(),
                },
                model_id,
                revision,
            )
        })?;

        self.list_manifest(&repo, revision, token)
            .await
            .map_err(|e| map_error(e, model_id, revision))
    }

    fn file_url(&self, model_id: &str, revision: &str, path: &str) -> String {
        self.endpoints.file_url(model_id, revision, path)
    }
}
