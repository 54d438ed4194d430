//! Bundles command handler: print the catalog.

use anyhow::Result;
use edgefetch_core::BundleDescriptor;

use crate::bootstrap::CliContext;
use crate::presentation::{print_separator, truncate_string};

/// Execute the bundles command.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let registry = ctx.orchestrator().registry();
    if registry.is_empty() {
        println!("No bundles in the catalog.");
        return Ok(());
    }

    println!("{:<20} {:<40} Auxiliary", "ID", "Primary");
    print_separator(90);
    for bundle in registry.bundles() {
        println!(
            "{:<20} {:<40} {}",
            truncate_string(&bundle.id, 19),
            truncate_string(&bundle.primary.model_id, 39),
            auxiliary_summary(bundle)
        );
        if !bundle.description.is_empty() {
            println!("{:<20} {}", "", bundle.description);
        }
    }
    Ok(())
}

/// Configured roles joined by commas, or `--`.
pub fn auxiliary_summary(bundle: &BundleDescriptor) -> String {
    let roles: Vec<&str> = bundle.required_roles().map(|r| r.as_str()).collect();
    if roles.is_empty() {
        "--".to_string()
    } else {
        roles.join(", ")
    }
}
