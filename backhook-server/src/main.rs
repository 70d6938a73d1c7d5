//! Backhook Server
//!
//! Receives backup reports over HTTP, archives the raw text, and relays a
//! size-bounded summary to a chat webhook.
//!
//! Architecture:
//! - Configuration: loaded once from the environment (and `.env`)
//! - API: `/webhook` intake, `/health`, static `/logs`
//! - Services: log archive, retention sweep, notify pipeline

pub mod api;
pub mod config;
pub mod service;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::service::retention::spawn_retention_sweep;
use crate::service::{FsLogStore, LogStore};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backhook_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Backhook Server...");
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    if config.sink_url.is_none() {
        warn!("DISCORD_WEBHOOK_URL is not set; requests must supply discordWebhook");
    }

    let fs_store = FsLogStore::new(&config.logs_dir);
    info!("Archiving reports under {}", fs_store.root().display());
    let store: Arc<dyn LogStore> = Arc::new(fs_store);
    let _sweep = spawn_retention_sweep(
        Arc::clone(&store),
        config.log_retention(),
        config.sweep_interval,
    );

    let addr = config.bind_addr();
    let retention_days = config.log_retention_days;
    let app = api::create_router(api::AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server is running on {}", addr);
    info!("Log retention period set to {} days", retention_days);

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
