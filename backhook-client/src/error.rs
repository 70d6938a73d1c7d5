//! Error types for the sink client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when delivering to the sink
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Sink returned an error status code
    #[error("Sink error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body from the sink
        message: String,
    },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Status code returned by the sink, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(err) => err.status().map(|s| s.as_u16()),
        }
    }

    /// The sink rejected the payload itself (400 Bad Request or 404 Not Found)
    pub fn is_structural_rejection(&self) -> bool {
        matches!(self, Self::ApiError { status: 400 | 404, .. })
    }
}
