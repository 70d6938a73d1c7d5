//! Backhook Sink Client
//!
//! Delivers rendered notification documents to the chat sink's webhook.
//!
//! [`HttpSink`] is the transport: one JSON POST per call, returning the raw
//! response body. [`Dispatcher`] layers the delivery protocol on top: send
//! the primary documents, and if the sink rejects their structure, send a
//! single minimal fallback document instead.
//!
//! # Example
//!
//! ```no_run
//! use backhook_client::{Dispatcher, HttpSink};
//! use backhook_core::domain::notification::Embed;
//!
//! # async fn example() -> backhook_client::Result<()> {
//! let dispatcher = Dispatcher::new(HttpSink::new());
//! let documents = vec![Embed { title: "Backup Summary (1 Jobs)".into(), ..Default::default() }];
//!
//! let outcome = dispatcher
//!     .deliver("https://discord.com/api/webhooks/1/abc", documents, || Embed {
//!         title: "Backup Complete".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("fallback used: {}", outcome.fallback_used);
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod error;

pub use dispatch::{DeliveryOutcome, Dispatcher};
pub use error::{ClientError, Result};

use async_trait::async_trait;
use backhook_core::domain::notification::WebhookPayload;
use reqwest::Client;

/// Transport for notification payloads
#[async_trait]
pub trait Sink: Send + Sync {
    /// Posts one payload to `url`
    ///
    /// # Returns
    /// The response body on a 2xx status, otherwise a [`ClientError`]
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<String>;
}

/// HTTP implementation of [`Sink`]
///
/// No timeout is set beyond the transport default.
#[derive(Debug, Clone, Default)]
pub struct HttpSink {
    client: Client,
}

impl HttpSink {
    /// Create a sink with a default HTTP client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Create a sink with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Check the status code and return the body text
    async fn handle_response(&self, response: reqwest::Response) -> Result<String> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl Sink for HttpSink {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<String> {
        tracing::debug!("Posting {} embed(s) to sink", payload.embeds.len());
        let response = self.client.post(url).json(payload).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backhook_core::domain::notification::Embed;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn payload() -> WebhookPayload {
        WebhookPayload::new(vec![Embed {
            title: "Backup Complete".to_string(),
            color: 2123412,
            ..Default::default()
        }])
    }

    #[tokio::test]
    async fn test_send_posts_json_and_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "content": "",
                "embeds": [{ "title": "Backup Complete", "color": 2123412 }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("delivered"))
            .expect(1)
            .mount(&server)
            .await;

        let body = HttpSink::new()
            .send(&format!("{}/hook", server.uri()), &payload())
            .await
            .unwrap();
        assert_eq!(body, "delivered");
    }

    #[tokio::test]
    async fn test_no_content_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let body = HttpSink::new().send(&server.uri(), &payload()).await.unwrap();
        assert_eq!(body, "");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Invalid Form Body"))
            .mount(&server)
            .await;

        let err = HttpSink::new()
            .send(&server.uri(), &payload())
            .await
            .unwrap_err();
        assert!(err.is_structural_rejection());
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Invalid Form Body"));
    }

    #[tokio::test]
    async fn test_unreachable_sink_is_request_failure() {
        let err = HttpSink::new()
            .send("http://127.0.0.1:9/hook", &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
        assert!(!err.is_structural_rejection());
    }
}
