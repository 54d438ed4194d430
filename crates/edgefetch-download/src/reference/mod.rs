//! Model reference resolution.
//!
//! Accepts what users paste: bare ids, hub URLs (including `/tree/<rev>`
//! links) and `.git` clone URLs. No network access.

mod aliases;

use edgefetch_core::download::{AcquireError, AcquireResult, DEFAULT_REVISION, ModelReference};
use tracing::debug;

pub use aliases::{AliasEntry, AliasTable};

/// URL prefixes stripped before lookup, matched case-insensitively.
const KNOWN_PREFIXES: &[&str] = &[
    "https://huggingface.co/",
    "http://huggingface.co/",
    "https://hf.co/",
    "http://hf.co/",
    "huggingface.co/",
    "hf.co/",
    "hf://",
];

/// Path markers that separate the id from a revision in hub URLs.
const REVISION_MARKERS: &[&str] = &["tree", "blob", "resolve"];

/// Resolves raw ids to canonical references.
#[derive(Debug, Clone, Default)]
pub struct ModelReferenceResolver {
    aliases: AliasTable,
}

impl ModelReferenceResolver {
    /// Create a resolver over an alias table.
    pub const fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// The alias table in use.
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolve `raw_id` at `revision` (default branch when `None` or blank).
    pub fn resolve(&self, raw_id: &str, revision: Option<&str>) -> AcquireResult<ModelReference> {
        let explicit_revision = revision.map(str::trim).filter(|r| !r.is_empty());
        let (normalized, url_revision) = normalize(raw_id);

        if normalized.is_empty() {
            return Err(AcquireError::invalid_reference(format!(
                "'{}' does not name a model",
                raw_id.trim()
            )));
        }

        let caller_revision = explicit_revision.or(url_revision.as_deref());
        let requested_revision = caller_revision.unwrap_or(DEFAULT_REVISION).to_string();

        let (resolved_id, resolved_revision, alias_applied) =
            match self.aliases.lookup(&normalized) {
                Some(entry) => {
                    let revision = caller_revision
                        .or(entry.revision.as_deref())
                        .unwrap_or(DEFAULT_REVISION);
                    debug!(
                        requested = %normalized,
                        canonical = %entry.canonical_id,
                        "Applied model alias"
                    );
                    (entry.canonical_id.clone(), revision.to_string(), true)
                }
                None => (normalized, requested_revision.clone(), false),
            };

        validate_id(&resolved_id)?;

        Ok(ModelReference {
            requested_id: raw_id.trim().to_string(),
            requested_revision,
            resolved_id,
            resolved_revision,
            alias_applied,
        })
    }
}

/// Strip URL decoration; returns the bare id and any revision found in the URL.
fn normalize(raw_id: &str) -> (String, Option<String>) {
    let mut id = raw_id.trim();

    for prefix in KNOWN_PREFIXES {
        if let Some(head) = id.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                id = &id[prefix.len()..];
                break;
            }
        }
    }

    let id = id.trim_end_matches('/');
    let id = id.strip_suffix(".git").unwrap_or(id).trim_end_matches('/');

    let segments: Vec<&str> = id.split('/').collect();
    if segments.len() > 2 && REVISION_MARKERS.contains(&segments[2]) {
        let revision = segments
            .get(3)
            .filter(|r| !r.is_empty())
            .map(|r| (*r).to_string());
        return (segments[..2].join("/"), revision);
    }

    (id.to_string(), None)
}

fn validate_id(id: &str) -> AcquireResult<()> {
    let segments: Vec<&str> = id.split('/').collect();
    if segments.len() > 2 {
        return Err(AcquireError::invalid_reference(format!(
            "'{id}' has too many path segments (expected owner/name)"
        )));
    }

    for segment in segments {
        let valid = !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(AcquireError::invalid_reference(format!(
                "'{id}' is not a valid model id"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ModelReferenceResolver {
        ModelReferenceResolver::new(AliasTable::builtin())
    }

    #[test]
    fn test_unknown_id_passes_through() {
        let reference = resolver().resolve("Org/Some-Model.v2", None).unwrap();
        assert_eq!(reference.resolved_id, "Org/Some-Model.v2");
        assert_eq!(reference.resolved_revision, "main");
        assert_eq!(reference.requested_revision, "main");
        assert!(!reference.alias_applied);
    }

    #[test]
    fn test_url_prefix_and_git_suffix_stripped() {
        let reference = resolver()
            .resolve("https://huggingface.co/org/model.git", Some("v1"))
            .unwrap();
        assert_eq!(reference.resolved_id, "org/model");
        assert_eq!(reference.resolved_revision, "v1");
        assert_eq!(reference.requested_id, "https://huggingface.co/org/model.git");
    }

    #[test]
    fn test_tree_url_carries_revision() {
        let reference = resolver()
            .resolve("https://huggingface.co/org/model/tree/dev", None)
            .unwrap();
        assert_eq!(reference.resolved_id, "org/model");
        assert_eq!(reference.resolved_revision, "dev");

        let reference = resolver()
            .resolve("hf.co/org/model/tree/dev", Some("main"))
            .unwrap();
        assert_eq!(reference.resolved_revision, "main");
    }

    #[test]
    fn test_alias_is_case_folded_but_passthrough_keeps_case() {
        let reference = resolver().resolve("  TinyLlama ", None).unwrap();
        assert!(reference.alias_applied);
        assert_eq!(reference.resolved_id, "TheBloke/TinyLlama-1.1B-Chat-v1.0-GGUF");
        assert_eq!(reference.requested_id, "TinyLlama");
    }

    #[test]
    fn test_alias_revision_only_when_caller_gives_none() {
        let resolver = ModelReferenceResolver::new(
            AliasTable::new().with_alias("pinned", AliasEntry::new("org/pinned").at_revision("v3")),
        );

        let reference = resolver.resolve("pinned", None).unwrap();
        assert_eq!(reference.resolved_revision, "v3");
        assert_eq!(reference.requested_revision, "main");

        let reference = resolver.resolve("pinned", Some("v4")).unwrap();
        assert_eq!(reference.resolved_revision, "v4");
    }

    #[test]
    fn test_invalid_ids_rejected() {
        for raw in ["", "   ", "a/b/c", "org/../x", "org/mo del", "https://huggingface.co/"] {
            let err = resolver().resolve(raw, None).unwrap_err();
            assert!(
                matches!(err, AcquireError::InvalidReference { .. }),
                "{raw:?} should be invalid"
            );
        }
    }
}
