//! API Module
//!
//! HTTP API layer for the relay.
//! Each submodule handles a single endpoint; archived logs are served
//! read-only under `/logs`.

pub mod error;
pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use backhook_client::{Dispatcher, HttpSink};
use backhook_core::{Limits, Renderer, ReportParser};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::service::{LogStore, NotifyService};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<NotifyService<HttpSink>>,
}

impl AppState {
    /// Wire the pipeline components from configuration
    pub fn new(config: Config, store: Arc<dyn LogStore>) -> Self {
        let notifier = NotifyService::new(
            store,
            ReportParser::new(config.split_policy.clone()),
            Renderer::new(Limits::default(), config.render_profile.clone()),
            Dispatcher::new(HttpSink::new()),
        );
        Self {
            config: Arc::new(config),
            notifier: Arc::new(notifier),
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let logs = ServeDir::new(&state.config.logs_dir);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Report intake
        .route("/webhook", post(webhook::receive_report))
        // Archived reports
        .nest_service("/logs", logs)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
