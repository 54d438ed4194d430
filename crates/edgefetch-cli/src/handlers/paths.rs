//! Paths command handler.
//!
//! Displays the resolved cache root and where it came from.

use anyhow::Result;
use edgefetch_core::CACHE_DIR_ENV;

use crate::bootstrap::CliContext;

/// Execute the paths command, printing `key = value` lines.
pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("cache_root = {}", ctx.cache_root.path.display());
    println!("cache_root_source = {}", ctx.cache_root.source.label());
    println!("cache_root_env = {CACHE_DIR_ENV}");
    println!(
        "system_backend = {}",
        if ctx.system_backend_available {
            "curl"
        } else {
            "unavailable"
        }
    );
    Ok(())
}
