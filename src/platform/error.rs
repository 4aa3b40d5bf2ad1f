//! Error types for chat-platform calls.

use thiserror::Error;

/// Errors that can occur while talking to the chat platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("Discord returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// A payload could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
