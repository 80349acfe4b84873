use crate::domain::delivery::{DeliveryOutcome, ResultCode};
use crate::domain::ports::{CapabilityError, CapabilityResult, ChatCapability};
use crate::infrastructure::config::AppConfig;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::time::{sleep, timeout, Duration};

const DEFAULT_FOCUS_SETTLE: Duration = Duration::from_millis(300);
const DEFAULT_PASTE_SETTLE: Duration = Duration::from_millis(200);
const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTimings {
    /// Pause between copying to the clipboard and pasting.
    pub focus_settle: Duration,
    /// Pause between pasting and submitting.
    pub paste_settle: Duration,
    /// Upper bound for a single host call; `None` waits forever.
    pub step_timeout: Option<Duration>,
}

impl PipelineTimings {
    pub fn immediate() -> Self {
        Self {
            focus_settle: Duration::ZERO,
            paste_settle: Duration::ZERO,
            step_timeout: None,
        }
    }
}

impl Default for PipelineTimings {
    fn default() -> Self {
        Self {
            focus_settle: DEFAULT_FOCUS_SETTLE,
            paste_settle: DEFAULT_PASTE_SETTLE,
            step_timeout: Some(DEFAULT_STEP_TIMEOUT),
        }
    }
}

impl From<&AppConfig> for PipelineTimings {
    fn from(config: &AppConfig) -> Self {
        Self {
            focus_settle: Duration::from_millis(config.focus_settle_ms),
            paste_settle: Duration::from_millis(config.paste_settle_ms),
            step_timeout: config.step_timeout(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    FocusChat,
    SubmitToChat,
    CopyToClipboard,
    PasteFromClipboard,
    SubmitCurrentInput,
    SendEnterKeystroke,
    SelectNextQuickPick,
    AcceptQuickPick,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Self::FocusChat => "focus_chat",
            Self::SubmitToChat => "submit_to_chat",
            Self::CopyToClipboard => "copy_to_clipboard",
            Self::PasteFromClipboard => "paste_from_clipboard",
            Self::SubmitCurrentInput => "submit_current_input",
            Self::SendEnterKeystroke => "send_raw_keystroke",
            Self::SelectNextQuickPick => "select_next_quick_pick",
            Self::AcceptQuickPick => "accept_quick_pick",
        }
    }

    fn done_line(self) -> &'static str {
        match self {
            Self::FocusChat => "✅ Chat opened",
            Self::SubmitToChat => "✅ Message submitted to the chat",
            Self::CopyToClipboard => "✅ Message copied to clipboard",
            Self::PasteFromClipboard => "✅ Message pasted into the chat input box",
            Self::SubmitCurrentInput => "✅ Chat input submitted",
            Self::SendEnterKeystroke => "✅ Enter key sent to the chat input",
            Self::SelectNextQuickPick => "✅ Quick pick item selected",
            Self::AcceptQuickPick => "✅ Quick pick item accepted",
        }
    }
}

/// Phase 2 strategies, tried in order until one yields a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SendStrategy {
    DirectSubmit,
    PasteAndSubmit,
    ClipboardOnly,
}

const SEND_STRATEGIES: [SendStrategy; 3] = [
    SendStrategy::DirectSubmit,
    SendStrategy::PasteAndSubmit,
    SendStrategy::ClipboardOnly,
];

impl SendStrategy {
    fn label(self) -> &'static str {
        match self {
            Self::DirectSubmit => "direct submit",
            Self::PasteAndSubmit => "clipboard paste with auto-submit",
            Self::ClipboardOnly => "clipboard copy only",
        }
    }
}

/// Ways to submit text that is already sitting in the chat input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Submitter {
    SubmitInput,
    EnterKeystroke,
    QuickPick,
}

const SUBMITTERS: [(Submitter, ResultCode); 3] = [
    (Submitter::SubmitInput, ResultCode::AutoSentWithEnter),
    (Submitter::EnterKeystroke, ResultCode::AutoSentWithType),
    (Submitter::QuickPick, ResultCode::AutoSentAttempt),
];

#[derive(Default)]
struct Trail {
    lines: Vec<String>,
    opened: bool,
}

impl Trail {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// A host call that panicked. Ends the delivery with `error_fallback`.
struct HostPanic {
    operation: Operation,
    reason: String,
}

type StepResult<T> = Result<T, HostPanic>;

#[derive(Clone, Debug, Default)]
pub struct DeliveryPipeline {
    timings: PipelineTimings,
}

impl DeliveryPipeline {
    pub fn new(timings: PipelineTimings) -> Self {
        Self { timings }
    }

    /// Drives the host's chat surface until one strategy succeeds.
    ///
    /// Host failures are routed strategy by strategy and never escape;
    /// each strategy is attempted at most once. A panicking host call stops
    /// the cascade with `error_fallback` and keeps the trail recorded so far.
    pub async fn deliver(&self, final_text: &str, capability: &dyn ChatCapability) -> DeliveryOutcome {
        let mut trail = Trail::default();

        let result = self.run(final_text, capability, &mut trail).await;
        match result {
            Ok(code) => DeliveryOutcome::new(code, trail.opened, trail.lines),
            Err(HostPanic { operation, reason }) => {
                tracing::error!(
                    host = capability.name(),
                    operation = operation.as_str(),
                    reason = %reason,
                    "host call panicked; falling back"
                );
                trail.push(format!("❌ Processing error: {reason}"));
                DeliveryOutcome::new(ResultCode::ErrorFallback, trail.opened, trail.lines)
            }
        }
    }

    async fn run(
        &self,
        final_text: &str,
        capability: &dyn ChatCapability,
        trail: &mut Trail,
    ) -> StepResult<ResultCode> {
        let opened = self
            .step(trail, Operation::FocusChat, capability.focus_chat())
            .await?;
        trail.opened = opened;
        if !opened {
            trail.push("⚠️ Unable to open the chat automatically");
            tracing::info!(host = capability.name(), result = "manual_required", "chat surface did not open");
            return Ok(ResultCode::ManualRequired);
        }

        for strategy in SEND_STRATEGIES {
            trail.push(format!("→ Trying {}", strategy.label()));
            if let Some(code) = self.attempt(strategy, final_text, capability, trail).await? {
                tracing::info!(
                    host = capability.name(),
                    strategy = strategy.label(),
                    result = code.as_str(),
                    "delivery strategy succeeded"
                );
                return Ok(code);
            }
        }

        trail.push("⚠️ Unable to hand the message to the chat, please input it manually");
        tracing::info!(host = capability.name(), result = "manual_input_required", "all delivery strategies failed");
        Ok(ResultCode::ManualInputRequired)
    }

    async fn attempt(
        &self,
        strategy: SendStrategy,
        final_text: &str,
        capability: &dyn ChatCapability,
        trail: &mut Trail,
    ) -> StepResult<Option<ResultCode>> {
        match strategy {
            SendStrategy::DirectSubmit => Ok(self
                .step(trail, Operation::SubmitToChat, capability.submit_to_chat(final_text))
                .await?
                .then_some(ResultCode::MessageSent)),
            SendStrategy::PasteAndSubmit => {
                if !self
                    .step(trail, Operation::CopyToClipboard, capability.copy_to_clipboard(final_text))
                    .await?
                {
                    return Ok(None);
                }
                sleep(self.timings.focus_settle).await;
                if !self
                    .step(trail, Operation::PasteFromClipboard, capability.paste_from_clipboard())
                    .await?
                {
                    return Ok(None);
                }
                sleep(self.timings.paste_settle).await;

                for (submitter, code) in SUBMITTERS {
                    if self.submit(submitter, capability, trail).await? {
                        return Ok(Some(code));
                    }
                }
                trail.push("🎯 Message pasted, press Enter in the chat to send it");
                Ok(Some(ResultCode::AutoPasted))
            }
            SendStrategy::ClipboardOnly => Ok(self
                .step(trail, Operation::CopyToClipboard, capability.copy_to_clipboard(final_text))
                .await?
                .then_some(ResultCode::CopiedToClipboard)),
        }
    }

    async fn submit(
        &self,
        submitter: Submitter,
        capability: &dyn ChatCapability,
        trail: &mut Trail,
    ) -> StepResult<bool> {
        match submitter {
            Submitter::SubmitInput => {
                self.step(trail, Operation::SubmitCurrentInput, capability.submit_current_input())
                    .await
            }
            Submitter::EnterKeystroke => {
                self.step(trail, Operation::SendEnterKeystroke, capability.send_raw_keystroke("\n"))
                    .await
            }
            Submitter::QuickPick => {
                if !self
                    .step(trail, Operation::SelectNextQuickPick, capability.select_next_quick_pick())
                    .await?
                {
                    return Ok(false);
                }
                self.step(trail, Operation::AcceptQuickPick, capability.accept_quick_pick())
                    .await
            }
        }
    }

    async fn step<F>(&self, trail: &mut Trail, operation: Operation, call: F) -> StepResult<bool>
    where
        F: Future<Output = CapabilityResult>,
    {
        let call = AssertUnwindSafe(call).catch_unwind();
        let caught = match self.timings.step_timeout {
            Some(limit) => match timeout(limit, call).await {
                Ok(caught) => caught,
                Err(_) => Ok(Err(CapabilityError::TimedOut {
                    operation: operation.as_str(),
                    after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })),
            },
            None => call.await,
        };
        let result = caught.map_err(|panic| HostPanic {
            operation,
            reason: panic_reason(panic.as_ref()),
        })?;

        match result {
            Ok(()) => {
                tracing::debug!(operation = operation.as_str(), "host call succeeded");
                trail.push(operation.done_line());
                Ok(true)
            }
            Err(error) => {
                tracing::debug!(operation = operation.as_str(), error = %error, "host call failed");
                trail.push(format!("⚠️ {} failed: {error}", operation.as_str()));
                Ok(false)
            }
        }
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
