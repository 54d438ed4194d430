//! List command handler.
//!
//! Displays cached models in a formatted table.

use anyhow::Result;
use edgefetch_core::CachedModel;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_size, print_separator, truncate_string};

/// Execute the list command.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let models = ctx
        .orchestrator()
        .list_cached_models()
        .await
        .map_err(CliError::from)?;

    if models.is_empty() {
        println!(
            "No cached models under {}.",
            ctx.orchestrator().cache_root().display()
        );
        println!("Use 'edgefetch acquire <model>' to download one.");
        return Ok(());
    }

    println!("Found {} cached model(s):\n", models.len());
    println!("{:<40} {:>10}  {:<20} Path", "Name", "Size", "Revisions");
    print_separator(100);
    for model in &models {
        println!(
            "{:<40} {:>10}  {:<20} {}",
            truncate_string(&model.name, 39),
            format_size(model.size_bytes),
            truncate_string(&model.revisions.join(","), 19),
            model.path.display()
        );
    }
    println!("\nTotal: {}", format_size(total_size(&models)));

    Ok(())
}

/// Sum of every model's size.
pub fn total_size(models: &[CachedModel]) -> u64 {
    models.iter().map(|m| m.size_bytes).sum()
}
