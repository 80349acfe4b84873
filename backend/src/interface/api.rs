use crate::application::report::CALLER_INSTRUCTIONS;
use crate::application::{RelayResult, RelayService};
use crate::domain::delivery::{AttachmentStatus, DeliveryRequest, ResultCode};
use crate::domain::AppError;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const STATUS_PROCESSED: &str = "success";

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayService,
}

impl AppState {
    pub fn new(relay: RelayService) -> Self {
        Self { relay }
    }
}

#[derive(Debug, Deserialize)]
pub struct MessagePayload {
    pub text: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl MessagePayload {
    /// `None` when the text is blank. Empty file fields count as absent.
    pub fn into_request(self) -> Option<DeliveryRequest> {
        if self.text.trim().is_empty() {
            return None;
        }
        Some(DeliveryRequest {
            text: self.text,
            file_path: self.file_path.filter(|path| !path.is_empty()),
            file_name: self.file_name.filter(|name| !name.is_empty()),
        })
    }
}

/// Reply for every request that reached the pipeline.
///
/// `status` is always `"success"`: it means the request was processed, not
/// that the message was delivered. `result`, `delivered` and `copilot_reply`
/// carry the delivery confidence.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: String,
    pub result: ResultCode,
    pub message: String,
    pub copilot_reply: String,
    pub instructions: String,
    pub delivered: bool,
    pub chat_opened: bool,
    pub attachment: AttachmentStatus,
}

impl From<RelayResult> for RelayResponse {
    fn from(result: RelayResult) -> Self {
        Self {
            status: STATUS_PROCESSED.to_string(),
            result: result.outcome.result_code,
            message: result.request.text,
            copilot_reply: result.report.reply,
            instructions: CALLER_INSTRUCTIONS.to_string(),
            delivered: result.outcome.message_sent,
            chat_opened: result.outcome.chat_opened,
            attachment: result.resolved.attachment_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub now: String,
    pub host_backend: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/message", post(message))
        .route("/api/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        now: Utc::now().to_rfc3339(),
        host_backend: state.relay.host_name(),
    })
}

/// Requests are not serialized against each other: when two deliveries
/// drive the host's chat at the same time, the later one wins.
async fn message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RelayResponse>, AppError> {
    let payload: MessagePayload = serde_json::from_slice(&body).map_err(|error| {
        tracing::warn!(error = %error, body_bytes = body.len(), "rejected malformed message request");
        AppError::invalid_request_format()
    })?;
    let request = payload.into_request().ok_or_else(|| {
        tracing::warn!("rejected message request with blank text");
        AppError::invalid_request_format()
    })?;

    let result = state.relay.relay(request).await;
    Ok(Json(RelayResponse::from(result)))
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
