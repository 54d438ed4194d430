//! Bundle acquisition.

use std::collections::BTreeMap;

use edgefetch_core::download::{
    AcquireError, AcquireResult, BundleDescriptor, BundleResult, ProgressCallback,
};
use tracing::info;

use super::{AcquireOptions, AcquireRequest, AcquisitionOrchestrator};

impl AcquisitionOrchestrator {
    /// Acquire a catalog bundle by id.
    pub async fn acquire_bundle_by_id(
        &self,
        bundle_id: &str,
        options: &AcquireOptions,
        progress: ProgressCallback,
    ) -> AcquireResult<BundleResult> {
        let bundle = self
            .registry
            .get(bundle_id)
            .cloned()
            .ok_or_else(|| AcquireError::not_found(format!("no bundle named '{bundle_id}'")))?;
        self.acquire_bundle(&bundle, options, progress).await
    }

    /// Acquire the primary file, then each configured auxiliary role, in order.
    ///
    /// A configured role that cannot be resolved fails the whole bundle with
    /// `BundleIncomplete`; unconfigured roles are reported as skipped.
    pub async fn acquire_bundle(
        &self,
        bundle: &BundleDescriptor,
        options: &AcquireOptions,
        progress: ProgressCallback,
    ) -> AcquireResult<BundleResult> {
        let cancel = self.call_token();

        info!(bundle = %bundle.id, "Acquiring bundle primary");
        let primary_request = AcquireRequest::from_file_ref(&bundle.primary, options.clone());
        let primary = self
            .acquire_with(&primary_request, &progress, &cancel)
            .await?;

        let mut auxiliary = BTreeMap::new();
        let mut skipped = Vec::new();

        for (role, file) in &bundle.auxiliary {
            let Some(file) = file else {
                skipped.push(*role);
                continue;
            };

            info!(bundle = %bundle.id, role = %role, model_id = %file.model_id, "Acquiring auxiliary file");
            let request = AcquireRequest::from_file_ref(file, options.clone());
            match self.acquire_with(&request, &progress, &cancel).await {
                Ok(result) => {
                    auxiliary.insert(*role, result);
                }
                Err(e) if e.is_unresolvable() => {
                    return Err(AcquireError::bundle_incomplete(role.as_str(), e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(BundleResult {
            bundle_id: bundle.id.clone(),
            primary,
            auxiliary,
            skipped,
        })
    }
}
