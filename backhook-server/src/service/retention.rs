//! Retention sweep
//!
//! Periodically removes archived logs older than the retention period.
//! The sweep is independent of request handling and never stops on error.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, error, info};

use crate::service::archive::{LogStore, SweepReport};

/// Run one sweep and log its outcome
pub async fn run_sweep(store: &dyn LogStore, max_age: Duration) -> Option<SweepReport> {
    match store.sweep(max_age).await {
        Ok(report) => {
            if report.deleted > 0 || report.failed > 0 {
                info!(
                    "Log retention sweep: scanned {}, deleted {}, failed {}",
                    report.scanned, report.deleted, report.failed
                );
            } else {
                debug!("Log retention sweep: nothing to delete");
            }
            Some(report)
        }
        Err(e) => {
            error!("Error cleaning up old logs: {}", e);
            None
        }
    }
}

/// Spawns the sweep loop
///
/// The first sweep runs immediately, then once per `interval`.
pub fn spawn_retention_sweep(
    store: Arc<dyn LogStore>,
    max_age: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    info!(
        "Starting log retention sweep (max age: {:?}, interval: {:?})",
        max_age, interval
    );

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        loop {
            ticker.tick().await;
            run_sweep(store.as_ref(), max_age).await;
        }
    })
}
