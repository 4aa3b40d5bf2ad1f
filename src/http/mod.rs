//! # HTTP Bridge
//!
//! The axum surface through which the storefront and Discord reach the
//! session actor.
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /checkout` | [`checkout::checkout_handler`] |
//! | `POST /set_lang` | [`language::set_lang_handler`] |
//! | `POST /interactions` | [`interactions::interactions_handler`] |
//! | `GET /health` | [`health_handler`] |
//!
//! Handlers never touch the platform themselves. They validate input, read the
//! current [`LanguageSetting`] once, and hand the work to [`SessionClient`],
//! which waits at most the configured bridge timeout.

pub mod checkout;
pub mod error;
pub mod interactions;
pub mod language;

pub use error::*;
pub use interactions::InteractionVerifier;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::clients::SessionClient;
use crate::model::LanguageSetting;

/// Shared by every handler.
pub struct AppState {
    pub session: SessionClient,
    pub language: Arc<LanguageSetting>,
    pub verifier: InteractionVerifier,
    /// How long a button press may wait before Discord gets a deferred response.
    pub press_deadline: Duration,
}

/// `{"message": ...}` success body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub language: String,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        language: state.language.get().code().to_string(),
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/checkout", post(checkout::checkout_handler))
        .route("/set_lang", post(language::set_lang_handler))
        .route("/interactions", post(interactions::interactions_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::Language;
    use crate::session_actor::ChatSession;
    use ed25519_dalek::SigningKey;

    pub const SIGNING_SEED: [u8; 32] = [7; 32];

    pub fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&SIGNING_SEED)
    }

    pub fn state(mock: &MockClient<ChatSession>, language: Language) -> Arc<AppState> {
        Arc::new(AppState {
            session: SessionClient::new(mock.client(), Duration::from_millis(200)),
            language: Arc::new(LanguageSetting::new(language)),
            verifier: InteractionVerifier::new(signing_key().verifying_key()),
            press_deadline: Duration::from_millis(100),
        })
    }
}
