//! Error type returned by every HTTP handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::session_actor::SessionError;

/// `{"error": ...}` failure body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Buyer name or id absent, or the body was not JSON.
    #[error("Missing data")]
    MissingData,

    #[error("Invalid language")]
    InvalidLanguage,

    /// The interaction signature did not verify.
    #[error("invalid request signature")]
    Unauthorized,

    /// The session actor failed, went away, or did not answer in time.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("bad interaction: {0}")]
    BadInteraction(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingData | Self::InvalidLanguage | Self::BadInteraction(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformError;

    async fn body_of(error: ApiError) -> (StatusCode, ErrorResponse) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors() {
        let (status, body) = body_of(ApiError::MissingData).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Missing data");

        let (status, body) = body_of(ApiError::InvalidLanguage).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Invalid language");

        let (status, _) = body_of(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_failure_is_500_with_message() {
        let error = ApiError::from(SessionError::Platform(PlatformError::Api {
            status: 403,
            body: "Missing Access".into(),
        }));
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Discord returned HTTP 403: Missing Access");
    }
}
