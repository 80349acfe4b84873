use crate::domain::delivery::DeliveryReport;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("host capability unavailable: {0}")]
    Unavailable(String),
    #[error("host rejected {command} ({status}): {body}")]
    Rejected {
        command: String,
        status: u16,
        body: String,
    },
    #[error("host bridge transport error: {0}")]
    Transport(String),
    #[error("clipboard error: {0}")]
    Clipboard(String),
    #[error("{operation} timed out after {after_ms}ms")]
    TimedOut {
        operation: &'static str,
        after_ms: u64,
    },
}

pub type CapabilityResult = std::result::Result<(), CapabilityError>;

/// The host's chat automation surface. Every operation may fail on its own;
/// success of one says nothing about any other.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    fn name(&self) -> &'static str;
    async fn focus_chat(&self) -> CapabilityResult;
    async fn submit_to_chat(&self, text: &str) -> CapabilityResult;
    async fn copy_to_clipboard(&self, text: &str) -> CapabilityResult;
    async fn paste_from_clipboard(&self) -> CapabilityResult;
    async fn submit_current_input(&self) -> CapabilityResult;
    async fn send_raw_keystroke(&self, text: &str) -> CapabilityResult;
    async fn select_next_quick_pick(&self) -> CapabilityResult;
    async fn accept_quick_pick(&self) -> CapabilityResult;
}

#[async_trait]
pub trait ReportSinkPort: Send + Sync {
    fn sink(&self) -> &'static str;
    async fn publish(&self, report: &DeliveryReport) -> Result<()>;
}
