use crate::domain::ports::{CapabilityError, CapabilityResult};

/// Writes text to the desktop clipboard shared with the host.
pub async fn write_system_clipboard(text: String) -> CapabilityResult {
    tokio::task::spawn_blocking(move || {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|error| CapabilityError::Clipboard(error.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|error| CapabilityError::Clipboard(error.to_string()))
    })
    .await
    .map_err(|error| CapabilityError::Clipboard(format!("clipboard task failed: {error}")))?
}
