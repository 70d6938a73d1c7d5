//! API Error Handling
//!
//! Maps failures at the request boundary to HTTP responses. Callers only
//! ever see a status code and a message; there are no structured codes.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use backhook_client::ClientError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Unrecovered request or delivery failure, sent as plain text
    BadRequest(String),
    /// No sink address in the configuration or the request
    SinkNotConfigured,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::SinkNotConfigured => {
                tracing::error!("DISCORD_WEBHOOK_URL is not set and the request has no override");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Discord webhook URL is not configured" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
