//! CLI entry point.
//!
//! Parses arguments, composes the engine via bootstrap and routes each
//! subcommand to its handler. Ctrl-C cancels in-flight acquisitions and a
//! second Ctrl-C quits.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};

use edgefetch_cli::handlers::acquire::AcquireArgs;
use edgefetch_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers, interrupt, logging};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables (HF_TOKEN, EDGEFETCH_CACHE_DIR) before parsing
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            eprintln!("Error: {err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig::with_cache_dir(cli.cache_dir).with_hub_url(cli.hub_url);
    let ctx = bootstrap(config)?;

    let orchestrator = Arc::clone(&ctx.orchestrator);
    tokio::spawn(interrupt::watch(
        tokio::signal::ctrl_c,
        move || {
            eprintln!("\nCancelling... (press Ctrl-C again to quit)");
            orchestrator.cancel();
        },
        || {
            eprintln!("\nInterrupted");
            std::process::exit(interrupt::INTERRUPTED_EXIT_CODE);
        },
    ));

    match command {
        Commands::Acquire {
            model,
            revision,
            file,
            variants,
            extensions,
            generic,
            token,
            force,
            system,
        } => {
            let args = AcquireArgs {
                model,
                revision,
                file,
                variants,
                extensions,
                generic,
                token,
                force,
                system,
            };
            handlers::acquire::execute(&ctx, args).await?;
        }
        Commands::Bundle {
            id,
            token,
            force,
            system,
        } => {
            handlers::bundle::execute(&ctx, &id, token, force, system).await?;
        }
        Commands::Bundles => {
            handlers::bundles::execute(&ctx)?;
        }
        Commands::List => {
            handlers::list::execute(&ctx).await?;
        }
        Commands::Clear { yes } => {
            handlers::clear::execute(&ctx, yes).await?;
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx)?;
        }
    }

    Ok(())
}
