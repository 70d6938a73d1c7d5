//! Webhook API Handler
//!
//! Receives backup reports and relays them to the notification sink.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use backhook_core::dto::webhook::WebhookRequest;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

/// POST /webhook
/// Archive, render and deliver one report
///
/// Responds with the sink's raw body on success.
pub async fn receive_report(
    State(state): State<AppState>,
    payload: Result<Json<WebhookRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, String)> {
    // Without a configured sink a broken body cannot name one either
    let Json(req) = payload.map_err(|rejection| match state.config.sink_url {
        Some(_) => ApiError::from(rejection),
        None => ApiError::SinkNotConfigured,
    })?;

    let sink_url = req
        .sink_override()
        .or(state.config.sink_url.as_deref())
        .ok_or(ApiError::SinkNotConfigured)?;

    tracing::info!(
        "Received report '{}' from node {} ({} bytes)",
        req.title(),
        req.node(),
        req.message_content.len()
    );

    let outcome = state
        .notifier
        .process(&req, sink_url)
        .await
        .map_err(|e| {
            tracing::error!("Error processing webhook: {}", e);
            ApiError::from(e)
        })?;

    Ok((StatusCode::OK, outcome.body))
}
