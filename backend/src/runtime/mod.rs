pub mod bootstrap;

use anyhow::Result;
use std::sync::Arc;

use crate::application::{DeliveryPipeline, PipelineTimings, RelayService};
use crate::domain::ports::ReportSinkPort;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::host::build_capability;
use crate::infrastructure::reports::build_report_sinks;
use crate::interface::api::AppState;
use crate::runtime::bootstrap::bootstrap_runtime_dirs;

/// Wires the relay once per process. The report sinks (including the log
/// channel) live as long as the returned state.
pub async fn build_app(config: &AppConfig) -> Result<AppState> {
    bootstrap_runtime_dirs(config).await?;

    let capability = build_capability(config)?;
    let reports: Arc<dyn ReportSinkPort> = build_report_sinks(config)?;
    let timings = PipelineTimings::from(config);
    tracing::info!(
        focus_settle_ms = config.focus_settle_ms,
        paste_settle_ms = config.paste_settle_ms,
        step_timeout_ms = config.step_timeout_ms,
        "delivery pipeline configured"
    );

    let relay = RelayService::new(capability, DeliveryPipeline::new(timings), reports);
    Ok(AppState::new(relay))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %error, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(error = %error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
