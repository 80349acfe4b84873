use serde::{Deserialize, Serialize};

/// One inbound call, already validated by the boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub text: String,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
}

impl DeliveryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_path: None,
            file_name: None,
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>, file_name: Option<String>) -> Self {
        self.file_path = Some(file_path.into());
        self.file_name = file_name;
        self
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentStatus {
    None,
    Embedded,
    MissingFile,
    ReadError,
}

impl AttachmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Embedded => "embedded",
            Self::MissingFile => "missing_file",
            Self::ReadError => "read_error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub final_text: String,
    pub attachment_status: AttachmentStatus,
    /// Display name of the attachment, when one was requested.
    pub attachment_name: Option<String>,
    /// Operator-facing line describing what happened to the attachment.
    pub attachment_note: Option<String>,
}

/// Terminal outcome of a delivery. Serialized values are part of the wire
/// contract with callers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    ManualRequired,
    MessageSent,
    AutoSentWithEnter,
    AutoSentWithType,
    AutoSentAttempt,
    AutoPasted,
    CopiedToClipboard,
    ManualInputRequired,
    ErrorFallback,
}

impl ResultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManualRequired => "manual_required",
            Self::MessageSent => "message_sent",
            Self::AutoSentWithEnter => "auto_sent_with_enter",
            Self::AutoSentWithType => "auto_sent_with_type",
            Self::AutoSentAttempt => "auto_sent_attempt",
            Self::AutoPasted => "auto_pasted",
            Self::CopiedToClipboard => "copied_to_clipboard",
            Self::ManualInputRequired => "manual_input_required",
            Self::ErrorFallback => "error_fallback",
        }
    }

    /// Whether the text reached the host: submitted, pasted or copied.
    pub fn message_sent(self) -> bool {
        matches!(
            self,
            Self::MessageSent
                | Self::AutoSentWithEnter
                | Self::AutoSentWithType
                | Self::AutoSentAttempt
                | Self::AutoPasted
                | Self::CopiedToClipboard
        )
    }

    pub fn is_auto_submitted(self) -> bool {
        matches!(
            self,
            Self::AutoSentWithEnter | Self::AutoSentWithType | Self::AutoSentAttempt
        )
    }

    /// Whether a human still has to finish sending the message.
    pub fn requires_manual_action(self) -> bool {
        !matches!(self, Self::MessageSent) && !self.is_auto_submitted()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub result_code: ResultCode,
    pub chat_opened: bool,
    pub message_sent: bool,
    pub summary_lines: Vec<String>,
}

impl DeliveryOutcome {
    pub fn new(result_code: ResultCode, chat_opened: bool, summary_lines: Vec<String>) -> Self {
        Self {
            result_code,
            chat_opened,
            message_sent: result_code.message_sent(),
            summary_lines,
        }
    }
}

/// What the human sees for one delivery.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DeliveryReport {
    pub result: ResultCode,
    pub notice: String,
    pub reply: String,
    pub lines: Vec<String>,
}
