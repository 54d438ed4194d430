//! Clear command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::format_size;

/// Execute the clear command.
///
/// Without `--yes` only reports what would be removed and fails with a usage
/// error.
pub async fn execute(ctx: &CliContext, yes: bool) -> Result<()> {
    let root = ctx.orchestrator().cache_root().to_path_buf();

    if !yes {
        let models = ctx
            .orchestrator()
            .list_cached_models()
            .await
            .map_err(CliError::from)?;
        let bytes: u64 = models.iter().map(|m| m.size_bytes).sum();
        println!(
            "This would delete {} ({} model(s), {}).",
            root.display(),
            models.len(),
            format_size(bytes)
        );
        return Err(CliError::Arguments("re-run with --yes to confirm".to_string()).into());
    }

    ctx.orchestrator()
        .clear_cache()
        .await
        .map_err(CliError::from)?;
    println!("✓ Cleared {}", root.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};

    fn context(dir: &tempfile::TempDir) -> CliContext {
        bootstrap(CliConfig::with_cache_dir(Some(
            dir.path().join("models").to_string_lossy().into_owned(),
        )))
        .unwrap()
    }

    #[tokio::test]
    async fn test_clear_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let file = dir.path().join("models/org--m/main/m.gguf");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"data").unwrap();

        let err = execute(&ctx, false).await.unwrap_err();
        let cli_err = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli_err.exit_code(), 2);
        assert!(file.exists());

        execute(&ctx, true).await.unwrap();
        assert!(!dir.path().join("models").exists());
    }

    #[tokio::test]
    async fn test_clear_missing_root_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        execute(&ctx, true).await.unwrap();
    }
}
