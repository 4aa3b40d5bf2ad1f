//! `POST /interactions`: Discord's outgoing-webhook for button presses.
//!
//! Discord signs every request with the application's Ed25519 key over
//! `timestamp ‖ body`; unsigned or tampered requests get 401 before anything
//! is parsed. A `PING` is answered with `PONG`. Component presses are bridged
//! to the session actor and its reply is sent back as an ephemeral message.
//!
//! Discord drops the interaction if it gets no answer within 3 seconds, while a
//! press may sit behind a slow checkout in the session queue. A press that is
//! not answered within [`AppState::press_deadline`] gets a deferred response
//! instead, and the reply is written into it later through the interaction
//! webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::{ApiError, AppState};
use crate::clients::SessionClient;
use crate::model::{ComponentPress, InteractionReply, OrderAction};
use crate::platform::{InteractionToken, Member, Snowflake, User};
use crate::session_actor::SessionError;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

pub const INTERACTION_PING: u8 = 1;
pub const INTERACTION_MESSAGE_COMPONENT: u8 = 3;

pub const CALLBACK_PONG: u8 = 1;
pub const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
/// "Thinking..." placeholder, replaced later via the interaction webhook.
pub const CALLBACK_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// Only the pressing user sees the message.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

pub const UNKNOWN_ACTION: &str = "Unknown action";

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("public key is not hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("public key must be 32 bytes, got {0}")]
    Length(usize),
    #[error("public key is not a valid Ed25519 point: {0}")]
    Key(#[from] ed25519_dalek::SignatureError),
}

/// Checks Discord's request signatures against the application public key.
#[derive(Debug, Clone)]
pub struct InteractionVerifier {
    key: VerifyingKey,
}

impl InteractionVerifier {
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Parses the hex public key shown in the developer portal.
    pub fn from_hex(public_key: &str) -> Result<Self, VerifierError> {
        let bytes: [u8; 32] = hex::decode(public_key.trim())?
            .try_into()
            .map_err(|raw: Vec<u8>| VerifierError::Length(raw.len()))?;
        Ok(Self::new(VerifyingKey::from_bytes(&bytes)?))
    }

    pub fn verify(&self, signature_hex: &str, timestamp: &str, body: &[u8]) -> bool {
        let Ok(raw) = hex::decode(signature_hex) else {
            return false;
        };
        let Ok(raw) = <[u8; 64]>::try_from(raw) else {
            return false;
        };
        let signature = Signature::from_bytes(&raw);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);
        self.key.verify(&message, &signature).is_ok()
    }
}

#[derive(Debug, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
    /// Present for presses inside a guild.
    #[serde(default)]
    pub member: Option<Member>,
    /// Present for presses in DMs.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub data: Option<ComponentData>,
    #[serde(default)]
    pub application_id: Option<Snowflake>,
    /// Addresses the response webhook for 15 minutes.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ComponentData {
    #[serde(default)]
    pub custom_id: String,
}

impl Interaction {
    fn user_id(&self) -> Option<Snowflake> {
        self.member
            .as_ref()
            .and_then(|m| m.user.as_ref())
            .or(self.user.as_ref())
            .map(|u| u.id)
    }

    fn response_token(&self) -> Option<InteractionToken> {
        Some(InteractionToken {
            application_id: self.application_id?,
            token: self.token.clone()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CallbackData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub flags: u64,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: CALLBACK_PONG,
            data: None,
        }
    }

    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: CALLBACK_CHANNEL_MESSAGE,
            data: Some(CallbackData {
                content: Some(content.into()),
                flags: FLAG_EPHEMERAL,
            }),
        }
    }

    /// The reply follows as an edit, visible only to the presser.
    pub fn deferred_ephemeral() -> Self {
        Self {
            kind: CALLBACK_DEFERRED_CHANNEL_MESSAGE,
            data: Some(CallbackData {
                content: None,
                flags: FLAG_EPHEMERAL,
            }),
        }
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

#[instrument(skip_all)]
pub async fn interactions_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, ApiError> {
    let (Some(signature), Some(timestamp)) = (
        header(&headers, SIGNATURE_HEADER),
        header(&headers, TIMESTAMP_HEADER),
    ) else {
        return Err(ApiError::Unauthorized);
    };
    if !state.verifier.verify(signature, timestamp, &body) {
        warn!("Rejected interaction with a bad signature");
        return Err(ApiError::Unauthorized);
    }

    let interaction: Interaction =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadInteraction(e.to_string()))?;
    debug!(kind = interaction.kind, channel_id = ?interaction.channel_id, "Interaction");

    match interaction.kind {
        INTERACTION_PING => Ok(Json(InteractionResponse::pong())),
        INTERACTION_MESSAGE_COMPONENT => {
            let custom_id = interaction
                .data
                .as_ref()
                .map(|d| d.custom_id.as_str())
                .unwrap_or_default();
            let Some(action) = OrderAction::from_custom_id(custom_id) else {
                debug!(custom_id, "Unknown component");
                return Ok(Json(InteractionResponse::ephemeral(UNKNOWN_ACTION)));
            };
            let channel_id = interaction
                .channel_id
                .ok_or_else(|| ApiError::BadInteraction("missing channel_id".into()))?;
            let user_id = interaction
                .user_id()
                .ok_or_else(|| ApiError::BadInteraction("missing user".into()))?;

            let press = ComponentPress {
                action,
                channel_id,
                user_id,
                language: state.language.get(),
            };
            let session = state.session.clone();
            let mut pending = tokio::spawn(async move { session.press(press).await });

            match tokio::time::timeout(state.press_deadline, &mut pending).await {
                Ok(joined) => {
                    let reply = joined
                        .map_err(|e| SessionError::ActorCommunicationError(e.to_string()))??;
                    Ok(Json(InteractionResponse::ephemeral(reply.content)))
                }
                Err(_) => {
                    info!(%channel_id, deadline = ?state.press_deadline, "Press still queued, deferring the response");
                    tokio::spawn(finish_deferred(
                        state.session.clone(),
                        interaction.response_token(),
                        pending,
                    ));
                    Ok(Json(InteractionResponse::deferred_ephemeral()))
                }
            }
        }
        other => Err(ApiError::BadInteraction(format!(
            "unsupported interaction type {other}"
        ))),
    }
}

/// Waits for a press that missed the deadline and writes its reply into the
/// deferred response.
async fn finish_deferred(
    session: SessionClient,
    interaction: Option<InteractionToken>,
    pending: JoinHandle<Result<InteractionReply, SessionError>>,
) {
    let content = match pending.await {
        Ok(Ok(reply)) => reply.content,
        Ok(Err(e)) => {
            warn!(error = %e, "Deferred press failed");
            format!("⚠️ {e}")
        }
        Err(e) => {
            warn!(error = %e, "Deferred press task failed");
            format!("⚠️ {e}")
        }
    };
    let Some(interaction) = interaction else {
        warn!("Deferred press carried no interaction token, reply dropped");
        return;
    };
    if let Err(e) = session.edit_reply(interaction, content).await {
        warn!(error = %e, "Failed to fill in deferred response");
    }
}
