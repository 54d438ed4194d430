//! Catalog of multi-file bundles.
//!
//! Built once and handed to the orchestrator; never mutated afterwards.

use std::collections::BTreeMap;

use edgefetch_core::download::{BundleDescriptor, BundleRole, FileRef};

/// Immutable bundle catalog, keyed by lowercase bundle id.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    bundles: BTreeMap<String, BundleDescriptor>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundles shipped with edgefetch.
    pub fn builtin() -> Self {
        let wan = BundleDescriptor::new(
            "wan2.1-t2v-1.3b",
            "Wan 2.1 text-to-video 1.3B",
            FileRef::quantized(
                "city96/Wan2.1-T2V-1.3B-gguf",
                "gguf",
                ["Q4_K_M", "Q4_0", "Q5_K_M", "Q8_0"],
            ),
        )
        .with_auxiliary(
            BundleRole::Vae,
            Some(FileRef::generic_file(
                "Comfy-Org/Wan_2.1_ComfyUI_repackaged",
                "split_files/vae/wan_2.1_vae.safetensors",
            )),
        )
        .with_auxiliary(
            BundleRole::TextEncoder,
            Some(FileRef::generic_file(
                "city96/umt5-xxl-encoder-gguf",
                "umt5-xxl-encoder-Q3_K_S.gguf",
            )),
        )
        .with_auxiliary(BundleRole::ClipVision, None);

        let sd15 = BundleDescriptor::new(
            "sd1.5",
            "Stable Diffusion 1.5 (single-file GGUF)",
            FileRef::quantized(
                "second-state/stable-diffusion-v1-5-GGUF",
                "gguf",
                ["Q4_0", "Q8_0"],
            ),
        )
        .with_auxiliary(BundleRole::Vae, None)
        .with_auxiliary(BundleRole::TextEncoder, None);

        Self::new().with_bundle(wan).with_bundle(sd15)
    }

    /// Add a bundle, replacing any bundle with the same id.
    #[must_use]
    pub fn with_bundle(mut self, bundle: BundleDescriptor) -> Self {
        self.bundles.insert(bundle.id.to_ascii_lowercase(), bundle);
        self
    }

    /// Look up a bundle by id, case-insensitively.
    pub fn get(&self, id: &str) -> Option<&BundleDescriptor> {
        self.bundles.get(&id.trim().to_ascii_lowercase())
    }

    /// All bundles, ordered by id.
    pub fn bundles(&self) -> impl Iterator<Item = &BundleDescriptor> {
        self.bundles.values()
    }

    /// Number of bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}
