use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Request-level errors, each terminal for the request that raised it.
///
/// There are no internal retries anywhere: every check short-circuits
/// immediately, and writes happen only after all validations pass, so no
/// variant requires cleanup of partial state.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be parsed.
    BadRequest { message: String },
    /// The submitted string is not a well-formed absolute URL.
    InvalidUrl { message: String },
    /// The submitted URL points at this service's own domain.
    InvalidDomain,
    /// The resolved short code is already mapped.
    CodeInUse { code: String },
    /// The client's quota for the current window is exhausted.
    RateLimited { reset_minutes: u64 },
    /// The store rejected the mapping write.
    StorageUnavailable { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    pub fn code_in_use(code: impl Into<String>) -> Self {
        Self::CodeInUse { code: code.into() }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "bad_request", message, json!({}))
            }
            AppError::InvalidUrl { message } => (
                StatusCode::BAD_REQUEST,
                "invalid_url",
                "Invalid URL".to_string(),
                json!({ "reason": message }),
            ),
            AppError::InvalidDomain => (
                StatusCode::BAD_REQUEST,
                "invalid_domain",
                "Invalid domain".to_string(),
                json!({}),
            ),
            AppError::CodeInUse { code } => (
                StatusCode::FORBIDDEN,
                "code_in_use",
                "URL custom short is already in use".to_string(),
                json!({ "code": code }),
            ),
            AppError::RateLimited { reset_minutes } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "rate_limited",
                "Rate limit exceeded".to_string(),
                json!({ "rate_limit_reset": reset_minutes }),
            ),
            AppError::StorageUnavailable { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_unavailable",
                "Unable to connect to server".to_string(),
                json!({ "reason": message }),
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(format!("Cannot parse JSON: {}", rejection.body_text()))
    }
}
