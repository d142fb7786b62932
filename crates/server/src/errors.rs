use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::FieldViolation;
use serde::Serialize;
use thiserror::Error;

/// JSON error envelope: `{"error": ..., "detail"?: ..., "errors"?: [...]}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
    pub errors: Vec<FieldViolation>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldViolation>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail, errors: Vec::new() }
    }

    pub fn validation(errors: Vec<FieldViolation>) -> Self {
        Self { errors, ..Self::new(StatusCode::BAD_REQUEST, "Validation Error", None) }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, msg, None)
    }

    /// Generic 500; the cause is logged by the caller and never sent to the client.
    pub fn server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server Error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.error, detail: self.detail, errors: self.errors };
        (self.status, Json(body)).into_response()
    }
}

/// Bodies that are not valid JSON for the target type are reported like any
/// other validation failure, under the `body` field.
impl From<JsonRejection> for JsonApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(vec![FieldViolation::new("body", &rejection.body_text())])
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
