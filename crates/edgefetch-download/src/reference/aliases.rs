//! Alias table mapping short or legacy names to canonical hub ids.

use std::collections::HashMap;

/// Canonical target of an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    /// Hub id used for every network call.
    pub canonical_id: String,
    /// Revision to use when the caller does not name one.
    pub revision: Option<String>,
}

impl AliasEntry {
    /// Alias to `canonical_id` at the caller's revision.
    pub fn new(canonical_id: impl Into<String>) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            revision: None,
        }
    }

    /// Pin a revision.
    #[must_use]
    pub fn at_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }
}

/// Immutable alias table. Keys are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, AliasEntry>,
}

impl AliasTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The aliases shipped with edgefetch.
    pub fn builtin() -> Self {
        Self::new()
            .with_alias(
                "tinyllama",
                AliasEntry::new("TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF"),
            )
            .with_alias(
                "smollm2-360m",
                AliasEntry::new("HuggingFaceTB/SmolLM2-360M-Instruct-GGUF"),
            )
            // The original repository was taken down and re-hosted.
            .with_alias(
                "runwayml/stable-diffusion-v1-5",
                AliasEntry::new("stable-diffusion-v1-5/stable-diffusion-v1-5"),
            )
            .with_alias("sd1.5", AliasEntry::new("second-state/stable-diffusion-v1-5-GGUF"))
            .with_alias("whisper-tiny", AliasEntry::new("ggerganov/whisper.cpp"))
    }

    /// Add an alias, replacing any existing entry for the same key.
    #[must_use]
    pub fn with_alias(mut self, key: &str, entry: AliasEntry) -> Self {
        self.entries.insert(key.trim().to_ascii_lowercase(), entry);
        self
    }

    /// Look up a normalized id.
    pub fn lookup(&self, id: &str) -> Option<&AliasEntry> {
        self.entries.get(&id.trim().to_ascii_lowercase())
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
