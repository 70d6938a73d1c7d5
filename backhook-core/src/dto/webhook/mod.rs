//! Webhook DTOs

use serde::{Deserialize, Serialize};

/// Node name used when the sender does not identify itself
pub const DEFAULT_NODE: &str = "pve";

/// Report submitted to `POST /webhook`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub message_content: String,
    #[serde(default)]
    pub message_title: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub url_log_accessible: Option<String>,
    /// Misspelled prefix some senders still use; only read when
    /// `urlLogAccessible` is absent
    #[serde(default)]
    pub url_log_accessable: Option<String>,
    #[serde(default)]
    pub node: Option<String>,
    /// Per-request sink override
    #[serde(default)]
    pub discord_webhook: Option<String>,
}

impl WebhookRequest {
    pub fn title(&self) -> &str {
        self.message_title.as_deref().unwrap_or_default()
    }

    pub fn severity(&self) -> &str {
        self.severity.as_deref().unwrap_or_default()
    }

    pub fn node(&self) -> &str {
        match self.node.as_deref() {
            Some(node) if !node.trim().is_empty() => node,
            _ => DEFAULT_NODE,
        }
    }

    /// URL prefix the archived log name is appended to
    pub fn log_url_prefix(&self) -> &str {
        if let Some(prefix) = self.url_log_accessible.as_deref() {
            return prefix;
        }
        match self.url_log_accessable.as_deref() {
            Some(prefix) => {
                tracing::warn!("Request uses deprecated field 'urlLogAccessable'");
                prefix
            }
            None => "",
        }
    }

    /// Non-empty per-request sink address, if any
    pub fn sink_override(&self) -> Option<&str> {
        self.discord_webhook
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
