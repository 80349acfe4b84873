use anyhow::Result;
use chat_relay_backend::infrastructure::config::AppConfig;
use chat_relay_backend::infrastructure::logging::init_logging;
use chat_relay_backend::interface::api::router;
use chat_relay_backend::runtime::{build_app, shutdown_signal};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let logging_runtime = init_logging(&config)?;
    info!(
        workspace = %config.workspace.display(),
        config_file = %config.config_path.display(),
        log_file = %logging_runtime.log_file.display(),
        log_level = %config.log_level,
        retention_days = config.log_retention_days,
        "chat-relay logging initialized"
    );

    let state = build_app(&config).await?;
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, host_backend = config.host_backend.as_str(), "chat-relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("chat-relay stopped");
    drop(logging_runtime);

    Ok(())
}
