//! Bundle command handler.

use anyhow::Result;
use edgefetch_download::AcquireOptions;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::acquire::print_result;
use crate::presentation::TransferProgress;

/// Execute the bundle command.
pub async fn execute(
    ctx: &CliContext,
    id: &str,
    token: Option<String>,
    force: bool,
    system: bool,
) -> Result<()> {
    let options = AcquireOptions {
        token,
        force_refresh: force,
        prefer_system_backend: system,
    };

    let progress = TransferProgress::new(id);
    let outcome = ctx
        .orchestrator()
        .acquire_bundle_by_id(id, &options, progress.callback())
        .await;
    progress.finish();

    let result = outcome.map_err(CliError::from)?;

    println!("Bundle '{}':", result.bundle_id);
    println!("[primary]");
    print_result(&result.primary);
    for (role, file) in &result.auxiliary {
        println!("[{role}]");
        print_result(file);
    }
    for role in &result.skipped {
        println!("[{role}] not needed by this bundle");
    }
    Ok(())
}
