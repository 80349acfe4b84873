use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub const INVALID_REQUEST_FORMAT: &str = "Invalid request format";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRequest,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
        }
    }
}

/// Boundary error. Never carries a delivery result code: anything that
/// reaches the pipeline is answered with a `RelayResponse` instead.
#[derive(Clone, Debug)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    status: StatusCode,
}

impl AppError {
    pub fn invalid_request_format() -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: INVALID_REQUEST_FORMAT.to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code.as_str(),
            }),
        )
            .into_response()
    }
}
