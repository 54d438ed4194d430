//! Manifest (recursive tree listing) retrieval.

use edgefetch_core::RemoteFileEntry;

use crate::error::{HfError, HfResult};
use crate::http::HttpBackend;
use crate::models::HfRepoRef;
use crate::parsing::parse_tree_entries;

use super::HfClient;

/// Upper bound on followed `Link: rel="next"` pages.
const MAX_MANIFEST_PAGES: usize = 100;

impl<B: HttpBackend> HfClient<B> {
    /// List every entry of `repo` at `revision`, following pagination.
    pub(crate) async fn list_manifest(
        &self,
        repo: &HfRepoRef,
        revision: &str,
        token: Option<&str>,
    ) -> HfResult<Vec<RemoteFileEntry>> {
        let token = self.effective_token(token);
        let mut url = self.endpoints.manifest_url(&repo.id(), revision)?;
        let origin = url.origin();
        let mut entries = Vec::new();

        for page in 0..MAX_MANIFEST_PAGES {
            let response = self.backend.get_page(&url, token).await?;
            entries.extend(parse_tree_entries(response.body)?);

            match response.next {
                // The token must not leave the configured API host.
                Some(next) if next.origin() != origin => {
                    tracing::warn!(
                        model_id = %repo,
                        next = %next,
                        "Refusing cross-origin manifest page"
                    );
                    return Err(HfError::InvalidResponse {
                        message: format!("manifest page link leaves the API host: {next}"),
                    });
                }
                Some(next) => {
                    tracing::debug!(model_id = %repo, page = page + 1, "Following manifest page");
                    url = next;
                }
                None => {
                    tracing::debug!(
                        model_id = %repo,
                        revision,
                        entries = entries.len(),
                        "Fetched manifest"
                    );
                    return Ok(entries);
                }
            }
        }

        Err(HfError::InvalidResponse {
            message: format!("manifest for {repo} exceeds {MAX_MANIFEST_PAGES} pages"),
        })
    }
}
