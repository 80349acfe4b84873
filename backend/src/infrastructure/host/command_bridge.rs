use crate::domain::ports::{CapabilityResult, ChatCapability};
use crate::infrastructure::config::ClipboardMode;
use crate::infrastructure::host::bridge_client::BridgeClient;
use crate::infrastructure::host::clipboard;
use async_trait::async_trait;
use serde_json::{json, Value};

pub const SUBMIT_TO_CHAT_COMMAND: &str = "workbench.action.chat.submitToChat";
pub const PASTE_COMMAND: &str = "editor.action.clipboardPasteAction";
pub const SUBMIT_INPUT_COMMAND: &str = "workbench.action.chat.submit";
pub const TYPE_COMMAND: &str = "type";
pub const QUICK_PICK_NEXT_COMMAND: &str = "workbench.action.quickOpenNavigateNext";
pub const QUICK_PICK_ACCEPT_COMMAND: &str = "workbench.action.acceptSelectedQuickOpenItem";

/// Drives the host's chat through its command surface, exposed over HTTP
/// by a companion bridge running inside the host.
pub struct CommandBridgeHost {
    bridge: BridgeClient,
    focus_command: String,
    participant: String,
    clipboard: ClipboardMode,
}

impl CommandBridgeHost {
    pub fn new(
        bridge: BridgeClient,
        focus_command: String,
        participant: String,
        clipboard: ClipboardMode,
    ) -> Self {
        Self {
            bridge,
            focus_command,
            participant,
            clipboard,
        }
    }

    async fn execute(&self, command: &str, args: Value) -> CapabilityResult {
        tracing::debug!(command, bridge = %self.bridge.base_url(), "host command");
        self.bridge
            .post("/commands", command, &json!({ "command": command, "args": args }))
            .await
    }
}

#[async_trait]
impl ChatCapability for CommandBridgeHost {
    fn name(&self) -> &'static str {
        "command_bridge"
    }

    async fn focus_chat(&self) -> CapabilityResult {
        self.execute(&self.focus_command, json!([])).await
    }

    async fn submit_to_chat(&self, text: &str) -> CapabilityResult {
        self.execute(
            SUBMIT_TO_CHAT_COMMAND,
            json!([{ "text": text, "participant": self.participant }]),
        )
        .await
    }

    async fn copy_to_clipboard(&self, text: &str) -> CapabilityResult {
        match self.clipboard {
            ClipboardMode::System => clipboard::write_system_clipboard(text.to_string()).await,
            ClipboardMode::Bridge => {
                self.bridge
                    .post("/clipboard", "clipboard.writeText", &json!({ "text": text }))
                    .await
            }
        }
    }

    async fn paste_from_clipboard(&self) -> CapabilityResult {
        self.execute(PASTE_COMMAND, json!([])).await
    }

    async fn submit_current_input(&self) -> CapabilityResult {
        self.execute(SUBMIT_INPUT_COMMAND, json!([])).await
    }

    async fn send_raw_keystroke(&self, text: &str) -> CapabilityResult {
        self.execute(TYPE_COMMAND, json!([{ "text": text }])).await
    }

    async fn select_next_quick_pick(&self) -> CapabilityResult {
        self.execute(QUICK_PICK_NEXT_COMMAND, json!([])).await
    }

    async fn accept_quick_pick(&self) -> CapabilityResult {
        self.execute(QUICK_PICK_ACCEPT_COMMAND, json!([])).await
    }
}
