//! Bundle (multi-file model) descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{DownloadResult, SelectionCriteria, SelectionMode};

/// Role of an auxiliary file within a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleRole {
    /// Variational autoencoder.
    Vae,
    /// Text encoder (T5, CLIP text tower, ...).
    TextEncoder,
    /// Image encoder used by image-conditioned variants.
    ClipVision,
}

impl BundleRole {
    /// All roles, in acquisition order.
    pub const ALL: [Self; 3] = [Self::Vae, Self::TextEncoder, Self::ClipVision];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vae => "vae",
            Self::TextEncoder => "text_encoder",
            Self::ClipVision => "clip_vision",
        }
    }
}

impl fmt::Display for BundleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where one file of a bundle lives and how to pick it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Hub repository id.
    pub model_id: String,
    /// Revision; `None` means the default branch.
    pub revision: Option<String>,
    /// Exact file path within the repository.
    pub filename: Option<String>,
    /// Ordered variant tokens.
    pub variant_tokens: Vec<String>,
    /// Extensions a candidate must carry.
    pub extensions: Vec<String>,
    /// Fallback rule when no hint matches.
    pub mode: SelectionMode,
}

impl FileRef {
    /// A quantized weight file chosen by variant tokens.
    pub fn quantized<I, S>(model_id: impl Into<String>, extension: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model_id: model_id.into(),
            revision: None,
            filename: None,
            variant_tokens: tokens.into_iter().map(Into::into).collect(),
            extensions: vec![extension.to_string()],
            mode: SelectionMode::Quantized,
        }
    }

    /// A single named file from a generic repository.
    pub fn generic_file(model_id: impl Into<String>, filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let extensions = filename
            .rsplit_once('.')
            .map(|(_, ext)| vec![ext.to_string()])
            .unwrap_or_default();
        Self {
            model_id: model_id.into(),
            revision: None,
            filename: Some(filename),
            variant_tokens: Vec::new(),
            extensions,
            mode: SelectionMode::Generic,
        }
    }

    /// Selection criteria for this reference.
    #[must_use]
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria {
            explicit_filename: self.filename.clone(),
            ordered_variant_tokens: self.variant_tokens.clone(),
            allowed_extensions: self.extensions.clone(),
        }
    }
}

/// The files a composite model needs.
///
/// An auxiliary role mapped to `None` is not configured for this model and is
/// skipped; a role mapped to `Some` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Catalog id (e.g., `wan2.1-t2v-1.3b`).
    pub id: String,
    /// Short human description.
    pub description: String,
    /// Primary weights.
    pub primary: FileRef,
    /// Auxiliary files by role.
    pub auxiliary: BTreeMap<BundleRole, Option<FileRef>>,
}

impl BundleDescriptor {
    /// Create a descriptor with no auxiliary roles.
    pub fn new(id: impl Into<String>, description: impl Into<String>, primary: FileRef) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            primary,
            auxiliary: BTreeMap::new(),
        }
    }

    /// Add (or explicitly leave unconfigured) an auxiliary role.
    #[must_use]
    pub fn with_auxiliary(mut self, role: BundleRole, file: Option<FileRef>) -> Self {
        self.auxiliary.insert(role, file);
        self
    }

    /// Roles that must be acquired.
    pub fn required_roles(&self) -> impl Iterator<Item = BundleRole> + '_ {
        self.auxiliary
            .iter()
            .filter_map(|(role, file)| file.as_ref().map(|_| *role))
    }
}

/// Outcome of a bundle acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleResult {
    /// Catalog id.
    pub bundle_id: String,
    /// Primary weights.
    pub primary: DownloadResult,
    /// Acquired auxiliary files.
    pub auxiliary: BTreeMap<BundleRole, DownloadResult>,
    /// Roles not configured for this model.
    pub skipped: Vec<BundleRole>,
}
