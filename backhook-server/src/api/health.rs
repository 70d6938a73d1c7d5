//! Health Check API Handler
//!
//! Liveness probe; does not touch the archive or the sink.

use axum::{http::StatusCode, response::IntoResponse};

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
