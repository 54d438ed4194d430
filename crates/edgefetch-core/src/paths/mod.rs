//! Cache root resolution and on-disk layout.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No terminal I/O; adapters decide how to present paths

mod cache_root;
mod error;
mod layout;

pub use error::PathError;

pub use cache_root::{
    CACHE_DIR_ENV, CacheRootResolution, CacheRootSource, DEFAULT_CACHE_DIR_RELATIVE,
    default_cache_root, normalize_user_path, resolve_cache_root,
};

pub use layout::{
    destination_path, ensure_parent_dir, model_dir, revision_dir_name, sanitize_model_id,
    validate_relative_path,
};
