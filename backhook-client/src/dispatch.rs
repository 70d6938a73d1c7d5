//! Delivery orchestration
//!
//! One delivery attempt makes at most two requests: the primary payload,
//! and a fallback payload when the sink rejects the primary one as
//! malformed. There is no retry, backoff or queueing beyond that.

use backhook_core::domain::notification::{Embed, WebhookPayload};

use crate::Sink;
use crate::error::Result;

/// Result of a successful delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Raw response body from the sink
    pub body: String,
    /// Whether the body came from the fallback request
    pub fallback_used: bool,
}

/// Sends documents to a sink with a single fallback attempt
#[derive(Debug, Clone)]
pub struct Dispatcher<S> {
    sink: S,
}

impl<S: Sink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Deliver `documents` to `sink_url`
    ///
    /// `fallback` is only invoked when the sink answers the primary request
    /// with a structural rejection (400 or 404). Any other failure, and any
    /// failure of the fallback request, is returned unchanged.
    pub async fn deliver<F>(
        &self,
        sink_url: &str,
        documents: Vec<Embed>,
        fallback: F,
    ) -> Result<DeliveryOutcome>
    where
        F: FnOnce() -> Embed,
    {
        let primary = WebhookPayload::new(documents);
        match self.sink.send(sink_url, &primary).await {
            Ok(body) => Ok(DeliveryOutcome {
                body,
                fallback_used: false,
            }),
            Err(err) if err.is_structural_rejection() => {
                tracing::warn!("Sink rejected notification ({}), sending fallback", err);
                let body = self
                    .sink
                    .send(sink_url, &WebhookPayload::new(vec![fallback()]))
                    .await?;
                tracing::info!("Fallback notification delivered");
                Ok(DeliveryOutcome {
                    body,
                    fallback_used: true,
                })
            }
            Err(err) => Err(err),
        }
    }
}
