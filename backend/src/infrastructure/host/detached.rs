use crate::domain::ports::{CapabilityError, CapabilityResult, ChatCapability};
use async_trait::async_trait;

const REASON: &str = "no host attached";

/// Host stand-in for running without a host: nothing can be automated, so
/// every request degrades to a manual hand-off.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedHost;

fn unavailable() -> CapabilityResult {
    Err(CapabilityError::Unavailable(REASON.to_string()))
}

#[async_trait]
impl ChatCapability for DetachedHost {
    fn name(&self) -> &'static str {
        "detached"
    }

    async fn focus_chat(&self) -> CapabilityResult {
        unavailable()
    }

    async fn submit_to_chat(&self, _text: &str) -> CapabilityResult {
        unavailable()
    }

    async fn copy_to_clipboard(&self, _text: &str) -> CapabilityResult {
        unavailable()
    }

    async fn paste_from_clipboard(&self) -> CapabilityResult {
        unavailable()
    }

    async fn submit_current_input(&self) -> CapabilityResult {
        unavailable()
    }

    async fn send_raw_keystroke(&self, _text: &str) -> CapabilityResult {
        unavailable()
    }

    async fn select_next_quick_pick(&self) -> CapabilityResult {
        unavailable()
    }

    async fn accept_quick_pick(&self) -> CapabilityResult {
        unavailable()
    }
}
