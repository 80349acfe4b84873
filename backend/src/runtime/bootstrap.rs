use anyhow::{Context, Result};

use crate::infrastructure::config::AppConfig;

pub async fn bootstrap_runtime_dirs(config: &AppConfig) -> Result<()> {
    for dir in [&config.workspace, &config.log_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create runtime dir: {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "ensured runtime directory");
    }
    Ok(())
}
