use crate::domain::delivery::{AttachmentStatus, DeliveryRequest, ResolvedMessage};
use std::io;
use std::path::Path;

const FALLBACK_LANGUAGE: &str = "text";

/// Merges an optional attachment into the outgoing message text.
///
/// Never fails: a missing or unreadable file becomes a visible note in the
/// text and is reported through `attachment_status`.
pub async fn resolve(request: &DeliveryRequest) -> ResolvedMessage {
    let Some(file_path) = request.file_path.as_deref() else {
        return ResolvedMessage {
            final_text: request.text.clone(),
            attachment_status: AttachmentStatus::None,
            attachment_name: None,
            attachment_note: None,
        };
    };

    let path = Path::new(file_path);
    let display_name = display_name(path, request.file_name.as_deref());

    match tokio::fs::try_exists(path).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(file_path = %file_path, "attachment does not exist");
            return ResolvedMessage {
                final_text: format!(
                    "{}\n\n⚠️ Note: Attached file {display_name} does not exist ({file_path})",
                    request.text
                ),
                attachment_status: AttachmentStatus::MissingFile,
                attachment_note: Some(format!("⚠️ File does not exist: {file_path}")),
                attachment_name: Some(display_name),
            };
        }
        Err(error) => return read_error(request, display_name, file_path, error),
    }

    // The file may vanish between the check above and this read.
    let content = match read_text(path).await {
        Ok(content) => content,
        Err(error) => return read_error(request, display_name, file_path, error),
    };

    let language = language_tag(path);
    let chars = content.chars().count();
    tracing::debug!(file_path = %file_path, language, chars, "attachment embedded");

    ResolvedMessage {
        final_text: format!(
            "{}\n\n📎 Attached file: {display_name}\n```{language}\n{content}\n```",
            request.text
        ),
        attachment_status: AttachmentStatus::Embedded,
        attachment_note: Some(format!("✅ File content read ({chars} characters)")),
        attachment_name: Some(display_name),
    }
}

async fn read_text(path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    String::from_utf8(bytes).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
}

fn read_error(
    request: &DeliveryRequest,
    display_name: String,
    file_path: &str,
    error: io::Error,
) -> ResolvedMessage {
    tracing::warn!(file_path = %file_path, error = %error, "attachment read failed");
    ResolvedMessage {
        final_text: format!(
            "{}\n\n❌ Note: Attached file {display_name} could not be read",
            request.text
        ),
        attachment_status: AttachmentStatus::ReadError,
        attachment_note: Some(format!("❌ File reading failed: {error}")),
        attachment_name: Some(display_name),
    }
}

fn display_name(path: &Path, file_name: Option<&str>) -> String {
    if let Some(name) = file_name.filter(|name| !name.trim().is_empty()) {
        return name.to_string();
    }
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Fence language for a file, from its extension.
pub fn language_tag(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return FALLBACK_LANGUAGE;
    };
    match extension.to_ascii_lowercase().as_str() {
        "py" | "pyw" => "python",
        "rs" => "rust",
        "ts" => "typescript",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "sh" | "bash" | "zsh" => "bash",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "swift" => "swift",
        "rb" => "ruby",
        "php" => "php",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sql" => "sql",
        "xml" => "xml",
        "lua" => "lua",
        "r" => "r",
        "ipynb" => "json",
        "txt" | "log" => "text",
        _ => FALLBACK_LANGUAGE,
    }
}
