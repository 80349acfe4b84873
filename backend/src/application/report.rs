use crate::domain::delivery::{DeliveryOutcome, DeliveryReport, DeliveryRequest, ResolvedMessage, ResultCode};
use chrono::{DateTime, Local};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const PREVIEW_CHARS: usize = 40;

pub const CALLER_INSTRUCTIONS: &str = "Please check the reply in the host application's chat panel";

/// Text returned to the caller as `copilot_reply`.
pub fn reply_for(result: ResultCode) -> &'static str {
    match result {
        ResultCode::MessageSent => "✅ Message automatically sent to the chat, please check the reply",
        ResultCode::AutoSentWithEnter | ResultCode::AutoSentWithType | ResultCode::AutoSentAttempt => {
            "🎉 Message fully automatically sent to the chat, please check the reply"
        }
        ResultCode::AutoPasted => "✅ Message pasted to the chat input box, please press Enter to send",
        ResultCode::CopiedToClipboard => "✅ Message copied to clipboard, please paste it in the chat",
        ResultCode::ManualRequired | ResultCode::ManualInputRequired => {
            "⚠️ Please manually send the message to the chat"
        }
        ResultCode::ErrorFallback => "❌ Processing error occurred, but message received",
    }
}

/// One-line status notice for the always-visible channel.
pub fn notice_for(result: ResultCode, text: &str) -> String {
    let preview = preview(text);
    match result {
        ResultCode::AutoPasted => format!("Message pasted to chat, press Enter to send: {preview}"),
        ResultCode::AutoSentWithEnter | ResultCode::AutoSentWithType | ResultCode::AutoSentAttempt => {
            format!("Message fully automatically sent to chat: {preview}")
        }
        ResultCode::MessageSent => format!("Message sent to chat: {preview}"),
        ResultCode::CopiedToClipboard => format!("Message copied, paste it into the chat: {preview}"),
        ResultCode::ErrorFallback => format!("Message received: {preview}"),
        _ => format!("Message ready, please send it to the chat manually: {preview}"),
    }
}

pub fn build_report(
    request: &DeliveryRequest,
    resolved: &ResolvedMessage,
    outcome: &DeliveryOutcome,
    at: DateTime<Local>,
) -> DeliveryReport {
    let mut lines = vec![
        format!("🐍 Incoming message [{}]", at.format("%H:%M:%S")),
        RULE.to_string(),
        format!("📝 {}", request.text),
    ];
    if let Some(name) = &resolved.attachment_name {
        lines.push(format!("📎 Attached file: {name}"));
    }
    if let Some(note) = &resolved.attachment_note {
        lines.push(note.clone());
    }
    lines.push(String::new());
    lines.extend(outcome.summary_lines.iter().cloned());
    lines.push(String::new());
    lines.extend(next_steps(outcome.result_code, &request.text));
    lines.push(RULE.to_string());

    DeliveryReport {
        result: outcome.result_code,
        notice: notice_for(outcome.result_code, &request.text),
        reply: reply_for(outcome.result_code).to_string(),
        lines,
    }
}

fn next_steps(result: ResultCode, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    match result {
        ResultCode::MessageSent => {
            lines.push("🎉 Message processing complete:".to_string());
            lines.push("• Message automatically sent to the chat".to_string());
        }
        ResultCode::AutoSentWithEnter | ResultCode::AutoSentWithType | ResultCode::AutoSentAttempt => {
            lines.push("🎉 Message processing complete:".to_string());
            lines.push("• Message fully automatically sent to the chat".to_string());
        }
        ResultCode::AutoPasted => {
            lines.push("🎉 Message processing complete:".to_string());
            lines.push("• Message pasted into the chat input box".to_string());
            lines.push("• 🎯 Press Enter to send it".to_string());
        }
        ResultCode::CopiedToClipboard => {
            lines.push("🎉 Message processing complete:".to_string());
            lines.push("• Message copied to clipboard".to_string());
            lines.push("• Paste it into the chat and send it".to_string());
        }
        ResultCode::ManualRequired => {
            lines.push("💡 The chat could not be opened automatically:".to_string());
            lines.push("• Open the chat view from the command palette".to_string());
            lines.push(format!("• Then send: \"{text}\""));
        }
        ResultCode::ManualInputRequired | ResultCode::ErrorFallback => {
            lines.push("💡 Manual action required:".to_string());
            lines.push(format!("• Copy this question into the chat: \"{text}\""));
        }
    }
    lines.push("• The reply will appear in the chat panel".to_string());
    lines
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
