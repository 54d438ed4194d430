//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Build the engine request from CLI input, call the orchestrator, format
//!   the outcome for the terminal
//! - Engine failures are wrapped in [`CliError`](crate::CliError) so `main`
//!   can pick the exit code

pub mod acquire;
pub mod bundle;
pub mod bundles;
pub mod clear;
pub mod list;
pub mod paths;
