//! JSON parsing for hub tree listings.

use edgefetch_core::{ContentHash, EntryKind, RemoteFileEntry};
use serde_json::Value;

use crate::error::{HfError, HfResult};
use crate::models::{HfLfsInfo, HfTreeEntry};

/// Parse a tree listing response into manifest entries, keeping hub order.
///
/// Items that do not deserialize (no `path`) are skipped.
pub fn parse_tree_entries(json: Value) -> HfResult<Vec<RemoteFileEntry>> {
    let Value::Array(items) = json else {
        return Err(HfError::InvalidResponse {
            message: "Expected array for tree response".to_string(),
        });
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<HfTreeEntry>(item) {
            Ok(entry) => Some(to_remote_entry(entry)),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed tree entry");
                None
            }
        })
        .collect())
}

/// Convert a raw tree entry into a manifest entry.
pub fn to_remote_entry(entry: HfTreeEntry) -> RemoteFileEntry {
    let entry_kind = parse_entry_kind(entry.kind.as_deref());
    let (size_bytes, content_hash) = match &entry.lfs {
        Some(lfs) => (lfs.size.or(entry.size), parse_lfs_hash(lfs)),
        None => (entry.size, None),
    };

    RemoteFileEntry {
        relative_path: entry.path,
        size_bytes,
        content_hash,
        entry_kind,
    }
}

/// Map the listing's `type` field. An absent field means an ordinary file.
fn parse_entry_kind(kind: Option<&str>) -> EntryKind {
    match kind {
        Some("file") => EntryKind::File,
        Some("directory" | "dir") => EntryKind::Dir,
        _ => EntryKind::Unspecified,
    }
}

fn parse_lfs_hash(lfs: &HfLfsInfo) -> Option<ContentHash> {
    if let (Some(algorithm), Some(hash)) = (&lfs.hash_algorithm, &lfs.hash) {
        return ContentHash::parse(&format!("{algorithm}:{hash}"));
    }
    lfs.oid.as_deref().and_then(ContentHash::parse)
}
