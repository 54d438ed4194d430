//! Acquisition request types.

use std::fmt;

use edgefetch_core::download::{FileRef, SelectionCriteria, SelectionMode};

/// Transfer options shared by single-file and bundle acquisition.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Per-call token; falls back to the engine's default token.
    pub token: Option<String>,
    /// Re-download even when the cached copy is valid.
    pub force_refresh: bool,
    /// Try the system download facility before streaming.
    pub prefer_system_backend: bool,
}

impl fmt::Debug for AcquireOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcquireOptions")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("force_refresh", &self.force_refresh)
            .field("prefer_system_backend", &self.prefer_system_backend)
            .finish()
    }
}

/// One file to acquire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireRequest {
    /// Raw model id, URL or alias.
    pub model_id: String,
    /// Revision; `None` means the default branch.
    pub revision: Option<String>,
    /// Exact filename or path suffix.
    pub filename: Option<String>,
    /// Variant tokens tried in order.
    pub variants: Vec<String>,
    /// Extensions a candidate must carry.
    pub extensions: Vec<String>,
    /// Size fallback rule.
    pub mode: SelectionMode,
    /// Transfer options.
    pub options: AcquireOptions,
}

impl AcquireRequest {
    /// Request a quantized `.gguf` file from `model_id`.
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            revision: None,
            filename: None,
            variants: Vec::new(),
            extensions: vec!["gguf".to_string()],
            mode: SelectionMode::Quantized,
            options: AcquireOptions::default(),
        }
    }

    /// Request the file described by a bundle entry.
    pub fn from_file_ref(file: &FileRef, options: AcquireOptions) -> Self {
        Self {
            model_id: file.model_id.clone(),
            revision: file.revision.clone(),
            filename: file.filename.clone(),
            variants: file.variant_tokens.clone(),
            extensions: file.extensions.clone(),
            mode: file.mode,
            options,
        }
    }

    #[must_use]
    pub fn with_revision(mut self, revision: Option<String>) -> Self {
        self.revision = revision;
        self
    }

    #[must_use]
    pub fn with_filename(mut self, filename: Option<String>) -> Self {
        self.filename = filename;
        self
    }

    #[must_use]
    pub fn with_variants(mut self, variants: Vec<String>) -> Self {
        self.variants = variants;
        self
    }

    /// Replace the allowed extensions; an empty list keeps the current ones.
    #[must_use]
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        if !extensions.is_empty() {
            self.extensions = extensions;
        }
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.options.token = token;
        self
    }

    #[must_use]
    pub const fn force_refresh(mut self, force: bool) -> Self {
        self.options.force_refresh = force;
        self
    }

    #[must_use]
    pub const fn prefer_system_backend(mut self, prefer: bool) -> Self {
        self.options.prefer_system_backend = prefer;
        self
    }

    /// Selection criteria for this request.
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria::for_extensions(self.extensions.iter().cloned())
            .with_filename(self.filename.clone())
            .with_variants(self.variants.clone())
    }
}
