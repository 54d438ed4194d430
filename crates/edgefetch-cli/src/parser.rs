//! CLI argument parsing structures.

use clap::Parser;

use crate::commands::Commands;

/// Fetch, verify and cache model files from a model hub.
#[derive(Parser)]
#[command(name = "edgefetch")]
#[command(about = "Fetch, verify and cache model files from a model hub")]
#[command(version)]
pub struct Cli {
    /// Override the cache root for this run
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<String>,

    /// Hub host to fetch from (defaults to https://huggingface.co)
    #[arg(long = "hub-url", env = "EDGEFETCH_HUB_URL", global = true)]
    pub hub_url: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
