//! Acquire command handler.

use anyhow::Result;
use edgefetch_core::{DownloadResult, SelectionMode};
use edgefetch_download::{AcquireRequest, DEFAULT_VARIANT_PREFERENCE};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{TransferProgress, format_size};

/// Acquire command arguments passed from the CLI.
#[derive(Debug, Clone, Default)]
pub struct AcquireArgs {
    pub model: String,
    pub revision: Option<String>,
    pub file: Option<String>,
    pub variants: Vec<String>,
    pub extensions: Vec<String>,
    pub generic: bool,
    pub token: Option<String>,
    pub force: bool,
    pub system: bool,
}

/// Extensions considered by `--generic` when `--extension` is not given.
pub const GENERIC_EXTENSIONS: &[&str] = &["safetensors", "gguf", "bin"];

/// Translate CLI arguments into an engine request.
///
/// Quantized requests without `--variant` or `--file` use the default
/// variant preference. Generic requests without `--extension` accept any
/// of [`GENERIC_EXTENSIONS`].
pub fn build_request(args: &AcquireArgs) -> AcquireRequest {
    let mode = if args.generic {
        SelectionMode::Generic
    } else {
        SelectionMode::Quantized
    };

    let variants = if args.variants.is_empty() && args.file.is_none() && !args.generic {
        DEFAULT_VARIANT_PREFERENCE.iter().map(ToString::to_string).collect()
    } else {
        args.variants.clone()
    };

    let extensions = if args.extensions.is_empty() && args.generic {
        GENERIC_EXTENSIONS.iter().map(ToString::to_string).collect()
    } else {
        args.extensions.clone()
    };

    AcquireRequest::new(args.model.clone())
        .with_revision(args.revision.clone())
        .with_filename(args.file.clone())
        .with_variants(variants)
        .with_extensions(extensions)
        .with_mode(mode)
        .with_token(args.token.clone())
        .force_refresh(args.force)
        .prefer_system_backend(args.system)
}

/// Execute the acquire command.
pub async fn execute(ctx: &CliContext, args: AcquireArgs) -> Result<()> {
    if args.system && !ctx.system_backend_available {
        eprintln!("curl not found; using the built-in downloader");
    }

    let request = build_request(&args);
    debug!(?request, "Acquire request");

    let progress = TransferProgress::new(&args.model);
    let outcome = ctx
        .orchestrator()
        .acquire(&request, progress.callback())
        .await;
    progress.finish();

    let result = outcome.map_err(CliError::from)?;
    print_result(&result);
    Ok(())
}

/// Print one acquired file.
pub fn print_result(result: &DownloadResult) {
    let verb = if result.from_cache { "Cached" } else { "Downloaded" };
    println!("✓ {verb}: {}", result.local_file.display());
    if result.alias_applied {
        println!(
            "  Model: {} (alias of '{}')",
            result.reference, result.reference.requested_id
        );
    } else {
        println!("  Model: {}", result.reference);
    }
    println!("  Size: {}", format_size(result.file_metadata.size_bytes));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(model: &str) -> AcquireArgs {
        AcquireArgs {
            model: model.to_string(),
            ..AcquireArgs::default()
        }
    }

    #[test]
    fn test_default_variants_applied_for_quantized() {
        let request = build_request(&args("org/m"));
        assert_eq!(request.variants, DEFAULT_VARIANT_PREFERENCE);
        assert_eq!(request.extensions, vec!["gguf"]);
        assert_eq!(request.mode, SelectionMode::Quantized);
        assert!(!request.options.force_refresh);
    }

    #[test]
    fn test_explicit_variants_kept_in_order() {
        let mut a = args("org/m");
        a.variants = vec!["Q8_0".to_string(), "Q4_0".to_string()];
        assert_eq!(build_request(&a).variants, vec!["Q8_0", "Q4_0"]);
    }

    #[test]
    fn test_generic_file_request() {
        let mut a = args("org/vae");
        a.generic = true;
        a.file = Some("vae.safetensors".to_string());
        a.extensions = vec!["safetensors".to_string()];
        a.force = true;
        a.system = true;
        a.token = Some("hf_x".to_string());

        let request = build_request(&a);
        assert_eq!(request.mode, SelectionMode::Generic);
        assert!(request.variants.is_empty());
        assert_eq!(request.filename.as_deref(), Some("vae.safetensors"));
        assert_eq!(request.extensions, vec!["safetensors"]);
        assert!(request.options.force_refresh);
        assert!(request.options.prefer_system_backend);
        assert_eq!(request.options.token.as_deref(), Some("hf_x"));
    }

    #[test]
    fn test_generic_defaults_to_weight_extensions() {
        let mut a = args("org/vae");
        a.generic = true;

        let request = build_request(&a);
        assert_eq!(request.mode, SelectionMode::Generic);
        assert_eq!(request.extensions, vec!["safetensors", "gguf", "bin"]);

        let quantized = build_request(&args("org/vae"));
        assert_eq!(quantized.extensions, vec!["gguf"]);
    }

    #[test]
    fn test_explicit_file_skips_default_variants() {
        let mut a = args("org/m");
        a.file = Some("m-Q8_0.gguf".to_string());
        assert!(build_request(&a).variants.is_empty());
    }
}
