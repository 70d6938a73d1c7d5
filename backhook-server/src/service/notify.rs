//! Notify Service
//!
//! Runs one inbound report through the pipeline: archive the raw text,
//! parse it, render documents linking to the archive, and deliver them.

use std::sync::Arc;

use backhook_client::{DeliveryOutcome, Dispatcher, Sink};
use backhook_core::dto::webhook::WebhookRequest;
use backhook_core::{RenderContext, Renderer, ReportParser};

use crate::service::archive::LogStore;

pub type Result<T> = backhook_client::Result<T>;

pub struct NotifyService<S> {
    store: Arc<dyn LogStore>,
    parser: ReportParser,
    renderer: Renderer,
    dispatcher: Dispatcher<S>,
}

impl<S: Sink> NotifyService<S> {
    pub fn new(
        store: Arc<dyn LogStore>,
        parser: ReportParser,
        renderer: Renderer,
        dispatcher: Dispatcher<S>,
    ) -> Self {
        Self {
            store,
            parser,
            renderer,
            dispatcher,
        }
    }

    /// Archive, render and deliver one report to `sink_url`
    ///
    /// A failed archive write is logged and the notification goes out
    /// without a log link. Delivery errors are returned to the caller.
    pub async fn process(
        &self,
        request: &WebhookRequest,
        sink_url: &str,
    ) -> Result<DeliveryOutcome> {
        let log_reference = match self.store.store(&request.message_content).await {
            Ok(file_name) => {
                tracing::info!("Log file {} written to disk", file_name);
                Some(file_name)
            }
            Err(e) => {
                tracing::warn!("Failed to archive report, continuing without log link: {}", e);
                None
            }
        };

        let parsed = self.parser.parse(&request.message_content);
        tracing::debug!(
            "Parsed report: {} job(s), all ok: {}",
            parsed.records.len(),
            parsed.all_ok()
        );

        let ctx = RenderContext {
            title: request.title(),
            severity: request.severity(),
            node: request.node(),
            link_prefix: request.log_url_prefix(),
            message: &request.message_content,
        };
        let documents = self.renderer.render(&parsed, log_reference.as_deref(), &ctx);

        self.dispatcher
            .deliver(sink_url, documents, || {
                self.renderer.fallback(&parsed, log_reference.as_deref(), &ctx)
            })
            .await
    }
}
