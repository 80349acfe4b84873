pub mod bridge_client;
pub mod clipboard;
pub mod command_bridge;
pub mod detached;

use crate::domain::ports::ChatCapability;
use crate::infrastructure::config::{AppConfig, HostBackend};
use anyhow::Result;
use std::sync::Arc;

pub use bridge_client::BridgeClient;
pub use command_bridge::CommandBridgeHost;
pub use detached::DetachedHost;

pub fn build_capability(config: &AppConfig) -> Result<Arc<dyn ChatCapability>> {
    let capability: Arc<dyn ChatCapability> = match config.host_backend {
        HostBackend::CommandBridge => Arc::new(CommandBridgeHost::new(
            BridgeClient::new(
                config.bridge_url.clone(),
                config.bridge_token.clone(),
                config.step_timeout(),
            )?,
            config.focus_command.clone(),
            config.chat_participant.clone(),
            config.clipboard,
        )),
        HostBackend::Detached => Arc::new(DetachedHost),
    };
    tracing::info!(
        host = capability.name(),
        bridge_url = %config.bridge_url,
        "host capability initialized"
    );
    Ok(capability)
}
