//! Subcommands of the `edgefetch` binary.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download one model file into the cache (or reuse the cached copy)
    Acquire {
        /// Hub model id ("org/name"), hub URL or alias (e.g. "tinyllama")
        model: String,
        /// Branch, tag or commit to download from
        #[arg(short, long)]
        revision: Option<String>,
        /// Exact file to download, matched by name or path suffix
        #[arg(short, long)]
        file: Option<String>,
        /// Preferred variant token, in priority order (repeatable)
        #[arg(long = "variant", value_name = "TOKEN")]
        variants: Vec<String>,
        /// Allowed file extension (repeatable; default "gguf", or safetensors/gguf/bin with --generic)
        #[arg(long = "extension", value_name = "EXT")]
        extensions: Vec<String>,
        /// Fall back to the largest file instead of the smallest
        #[arg(long)]
        generic: bool,
        /// Hub access token for gated or private models
        #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Download again even if a valid cached copy exists
        #[arg(long)]
        force: bool,
        /// Try the system download service (curl) first
        #[arg(long)]
        system: bool,
    },

    /// Download every file of a catalog bundle
    Bundle {
        /// Bundle id (see `edgefetch bundles`)
        id: String,
        /// Hub access token for gated or private models
        #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Download again even if valid cached copies exist
        #[arg(long)]
        force: bool,
        /// Try the system download service (curl) first
        #[arg(long)]
        system: bool,
    },

    /// List the bundle catalog
    Bundles,

    /// List cached models
    List,

    /// Delete everything under the cache root
    Clear {
        /// Skip the confirmation check
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the resolved cache root
    Paths,
}
