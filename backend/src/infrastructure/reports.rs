use crate::domain::delivery::DeliveryReport;
use crate::domain::ports::ReportSinkPort;
use crate::infrastructure::config::{AppConfig, HostBackend};
use crate::infrastructure::host::BridgeClient;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const REPORT_LOG_TARGET: &str = "chat_relay::report";
pub const LOG_CHANNEL_NAME: &str = "Python-to-Chat";

/// Fans a report out to every registered sink. One failing sink does not
/// stop the others.
#[derive(Default)]
pub struct ReportDispatcher {
    sinks: Vec<Arc<dyn ReportSinkPort>>,
}

impl ReportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, sink: Arc<dyn ReportSinkPort>) {
        self.sinks.push(sink);
    }

    pub fn sink_names(&self) -> Vec<&'static str> {
        self.sinks.iter().map(|sink| sink.sink()).collect()
    }
}

#[async_trait]
impl ReportSinkPort for ReportDispatcher {
    fn sink(&self) -> &'static str {
        "dispatcher"
    }

    async fn publish(&self, report: &DeliveryReport) -> Result<()> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(error) = sink.publish(report).await {
                failures.push(format!("{}: {error}", sink.sink()));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("report sinks failed: {}", failures.join("; ")))
        }
    }
}

/// The persistent, log-like channel. Lives for the whole process and writes
/// every report line through `tracing`, which lands in the daily log file.
pub struct LogChannelSink {
    channel: String,
}

impl LogChannelSink {
    pub fn new(channel: impl Into<String>) -> Self {
        let channel = channel.into();
        tracing::debug!(channel = %channel, "log channel opened");
        Self { channel }
    }
}

impl Drop for LogChannelSink {
    fn drop(&mut self) {
        tracing::debug!(channel = %self.channel, "log channel closed");
    }
}

#[async_trait]
impl ReportSinkPort for LogChannelSink {
    fn sink(&self) -> &'static str {
        "log_channel"
    }

    async fn publish(&self, report: &DeliveryReport) -> Result<()> {
        tracing::info!(
            target: REPORT_LOG_TARGET,
            channel = %self.channel,
            result = report.result.as_str(),
            "{}",
            report.notice
        );
        for line in &report.lines {
            tracing::info!(target: REPORT_LOG_TARGET, channel = %self.channel, "{line}");
        }
        Ok(())
    }
}

/// Asks the host to show the status notice and the full report.
pub struct HostNotifierSink {
    bridge: BridgeClient,
}

impl HostNotifierSink {
    pub fn new(bridge: BridgeClient) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl ReportSinkPort for HostNotifierSink {
    fn sink(&self) -> &'static str {
        "host_notifier"
    }

    async fn publish(&self, report: &DeliveryReport) -> Result<()> {
        self.bridge
            .post(
                "/notify",
                "notify",
                &json!({
                    "notice": report.notice,
                    "reply": report.reply,
                    "result": report.result,
                    "manual_action_required": report.result.requires_manual_action(),
                    "lines": report.lines,
                }),
            )
            .await
            .map_err(anyhow::Error::from)
    }
}

pub fn build_report_sinks(config: &AppConfig) -> Result<Arc<ReportDispatcher>> {
    let mut dispatcher = ReportDispatcher::new();
    dispatcher.register(Arc::new(LogChannelSink::new(LOG_CHANNEL_NAME)));
    if config.host_backend == HostBackend::CommandBridge {
        dispatcher.register(Arc::new(HostNotifierSink::new(BridgeClient::new(
            config.bridge_url.clone(),
            config.bridge_token.clone(),
            config.step_timeout(),
        )?)));
    }
    tracing::info!(sinks = ?dispatcher.sink_names(), "report sinks initialized");
    Ok(Arc::new(dispatcher))
}
