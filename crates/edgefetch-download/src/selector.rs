//! Manifest entry selection.
//!
//! # Selection Rules
//!
//! 1. Only file-like entries carrying an allowed extension are candidates.
//! 2. An explicit filename matches exactly (case-insensitive), then as a path
//!    suffix. A filename that matches nothing selects nothing.
//! 3. Otherwise the first variant token found as a case-insensitive substring
//!    of a candidate path wins, in token order.
//! 4. Fallback by size: [`SelectionMode::Quantized`] takes the smallest
//!    declared size, [`SelectionMode::Generic`] the largest.

use edgefetch_core::download::{RemoteFileEntry, SelectionCriteria, SelectionMode};

/// Default variant preference for quantized weights.
pub const DEFAULT_VARIANT_PREFERENCE: &[&str] = &["Q4_K_M", "Q4_0", "Q5_K_M", "Q8_0"];

/// Chooses one entry from a manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSelector {
    mode: SelectionMode,
}

impl FileSelector {
    /// Create a selector with the given fallback mode.
    pub const fn new(mode: SelectionMode) -> Self {
        Self { mode }
    }

    /// Selector for picking one weight file among quantization variants.
    pub const fn quantized() -> Self {
        Self::new(SelectionMode::Quantized)
    }

    /// Selector for single-artifact repositories.
    pub const fn generic() -> Self {
        Self::new(SelectionMode::Generic)
    }

    /// The fallback mode.
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Select one entry, or `None` when nothing qualifies.
    pub fn select<'a>(
        &self,
        entries: &'a [RemoteFileEntry],
        criteria: &SelectionCriteria,
    ) -> Option<&'a RemoteFileEntry> {
        let candidates: Vec<&RemoteFileEntry> = entries
            .iter()
            .filter(|entry| entry.entry_kind.is_file_like())
            .filter(|entry| {
                criteria.allowed_extensions.is_empty()
                    || criteria
                        .allowed_extensions
                        .iter()
                        .any(|ext| entry.has_extension(ext))
            })
            .collect();

        if candidates.is_empty() {
            return None;
        }

        if let Some(filename) = criteria.explicit_filename.as_deref() {
            return match_filename(&candidates, filename);
        }

        if let Some(entry) = match_variant(&candidates, &criteria.ordered_variant_tokens) {
            return Some(entry);
        }

        match self.mode {
            SelectionMode::Quantized => smallest(&candidates),
            SelectionMode::Generic => largest(&candidates),
        }
    }
}

fn match_filename<'a>(
    candidates: &[&'a RemoteFileEntry],
    filename: &str,
) -> Option<&'a RemoteFileEntry> {
    let wanted = filename.trim().trim_start_matches('/').to_ascii_lowercase();
    if wanted.is_empty() {
        return None;
    }

    candidates
        .iter()
        .find(|entry| entry.relative_path.to_ascii_lowercase() == wanted)
        .or_else(|| {
            candidates
                .iter()
                .find(|entry| entry.relative_path.to_ascii_lowercase().ends_with(&wanted))
        })
        .copied()
}

fn match_variant<'a>(
    candidates: &[&'a RemoteFileEntry],
    tokens: &[String],
) -> Option<&'a RemoteFileEntry> {
    tokens
        .iter()
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .find_map(|token| {
            candidates
                .iter()
                .find(|entry| entry.relative_path.to_ascii_lowercase().contains(&token))
                .copied()
        })
}

// Ties keep the earlier entry.
fn smallest<'a>(candidates: &[&'a RemoteFileEntry]) -> Option<&'a RemoteFileEntry> {
    candidates.iter().copied().fold(None, |best, entry| match best {
        Some(current) if size_or(current, u64::MAX) <= size_or(entry, u64::MAX) => Some(current),
        _ => Some(entry),
    })
}

fn largest<'a>(candidates: &[&'a RemoteFileEntry]) -> Option<&'a RemoteFileEntry> {
    candidates.iter().copied().fold(None, |best, entry| match best {
        Some(current) if size_or(current, 0) >= size_or(entry, 0) => Some(current),
        _ => Some(entry),
    })
}

fn size_or(entry: &RemoteFileEntry, missing: u64) -> u64 {
    entry.size_bytes.unwrap_or(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgefetch_core::download::EntryKind;

    fn variants_manifest() -> Vec<RemoteFileEntry> {
        vec![
            RemoteFileEntry::file("README.md").with_size(10),
            RemoteFileEntry::file("m-Q8_0.gguf").with_size(1300),
            RemoteFileEntry::file("m-Q4_0.gguf").with_size(900),
            RemoteFileEntry::file("m-Q4_K_M.gguf").with_size(1100),
        ]
    }

    fn gguf() -> SelectionCriteria {
        SelectionCriteria::for_extensions(["gguf"])
    }

    #[test]
    fn test_first_matching_token_wins() {
        let entries = variants_manifest();
        let criteria = gguf().with_variants(vec!["Q4_K_M".to_string(), "Q4_0".to_string()]);

        let selected = FileSelector::quantized().select(&entries, &criteria).unwrap();
        assert_eq!(selected.relative_path, "m-Q4_K_M.gguf");
    }

    #[test]
    fn test_tokens_match_case_insensitively() {
        let entries = variants_manifest();
        let criteria = gguf().with_variants(vec!["q8_0".to_string()]);

        let selected = FileSelector::quantized().select(&entries, &criteria).unwrap();
        assert_eq!(selected.relative_path, "m-Q8_0.gguf");
    }

    #[test]
    fn test_quantized_fallback_is_smallest() {
        let entries = variants_manifest();
        let criteria = gguf().with_variants(vec!["IQ2_XS".to_string()]);

        let selected = FileSelector::quantized().select(&entries, &criteria).unwrap();
        assert_eq!(selected.relative_path, "m-Q4_0.gguf");
    }

    #[test]
    fn test_generic_fallback_is_largest() {
        let entries = vec![
            RemoteFileEntry::file("vae/config.json").with_size(1),
            RemoteFileEntry::file("vae/diffusion_pytorch_model.fp16.safetensors").with_size(160),
            RemoteFileEntry::file("vae/diffusion_pytorch_model.safetensors").with_size(320),
        ];
        let criteria = SelectionCriteria::for_extensions(["safetensors"]);

        let selected = FileSelector::generic().select(&entries, &criteria).unwrap();
        assert_eq!(
            selected.relative_path,
            "vae/diffusion_pytorch_model.safetensors"
        );
    }

    #[test]
    fn test_explicit_filename_exact_then_suffix() {
        let entries = vec![
            RemoteFileEntry::file("sub/model.gguf").with_size(5),
            RemoteFileEntry::file("Model.gguf").with_size(7),
        ];

        let exact = gguf().with_filename(Some("model.gguf".to_string()));
        let selected = FileSelector::quantized().select(&entries, &exact).unwrap();
        assert_eq!(selected.relative_path, "Model.gguf");

        let suffix = gguf().with_filename(Some("sub/model.gguf".to_string()));
        let selected = FileSelector::quantized().select(&entries, &suffix).unwrap();
        assert_eq!(selected.relative_path, "sub/model.gguf");
    }

    #[test]
    fn test_unmatched_filename_selects_nothing() {
        let entries = variants_manifest();
        let criteria = gguf()
            .with_filename(Some("other.gguf".to_string()))
            .with_variants(vec!["Q4_0".to_string()]);

        assert!(FileSelector::quantized().select(&entries, &criteria).is_none());
    }

    #[test]
    fn test_directories_and_wrong_extensions_excluded() {
        let entries = vec![
            RemoteFileEntry::file("weights.gguf").with_kind(EntryKind::Dir),
            RemoteFileEntry::file("notes.txt").with_size(1),
        ];
        assert!(FileSelector::quantized().select(&entries, &gguf()).is_none());
        assert!(FileSelector::quantized().select(&[], &gguf()).is_none());
    }

    #[test]
    fn test_unspecified_kind_is_candidate() {
        let entries = vec![RemoteFileEntry::file("a.gguf").with_kind(EntryKind::Unspecified)];
        assert!(FileSelector::quantized().select(&entries, &gguf()).is_some());
    }

    #[test]
    fn test_size_ties_keep_manifest_order() {
        let entries = vec![
            RemoteFileEntry::file("a.gguf").with_size(4),
            RemoteFileEntry::file("b.gguf").with_size(4),
        ];
        let quant = FileSelector::quantized().select(&entries, &gguf()).unwrap();
        let generic = FileSelector::generic().select(&entries, &gguf()).unwrap();
        assert_eq!(quant.relative_path, "a.gguf");
        assert_eq!(generic.relative_path, "a.gguf");
    }

    #[test]
    fn test_missing_sizes_lose_both_fallbacks() {
        let entries = vec![
            RemoteFileEntry::file("unsized.gguf"),
            RemoteFileEntry::file("sized.gguf").with_size(4),
        ];
        let quant = FileSelector::quantized().select(&entries, &gguf()).unwrap();
        let generic = FileSelector::generic().select(&entries, &gguf()).unwrap();
        assert_eq!(quant.relative_path, "sized.gguf");
        assert_eq!(generic.relative_path, "sized.gguf");
    }
}
