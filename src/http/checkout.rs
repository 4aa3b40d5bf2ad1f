//! `POST /checkout`: the storefront webhook.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{ApiError, AppState, MessageResponse};
use crate::model::{Language, Order};

pub const DEFAULT_TOTAL: &str = "0.00";

/// Webhook body. Fields are loosely typed because the storefront sends ids
/// and totals as either strings or numbers.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutPayload {
    #[serde(default)]
    pub username: Option<Value>,
    #[serde(default)]
    pub discord_id: Option<Value>,
    #[serde(default)]
    pub cart: Option<Value>,
    #[serde(default)]
    pub total: Option<Value>,
}

/// Non-empty strings and numbers as text; anything else counts as absent.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl CheckoutPayload {
    pub fn into_order(self, language: Language) -> Result<Order, ApiError> {
        let buyer_name = scalar_text(self.username.as_ref()).ok_or(ApiError::MissingData)?;
        let buyer_id = scalar_text(self.discord_id.as_ref()).ok_or(ApiError::MissingData)?;

        let items = match self.cart {
            Some(Value::Array(entries)) => entries
                .into_iter()
                .map(|entry| match entry {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                debug!(cart = %other, "Ignoring non-list cart");
                Vec::new()
            }
        };
        let total = scalar_text(self.total.as_ref()).unwrap_or_else(|| DEFAULT_TOTAL.to_string());

        Ok(Order::new(buyer_name, buyer_id, items, total, language))
    }
}

#[instrument(skip_all)]
pub async fn checkout_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckoutPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "Unreadable checkout body");
        ApiError::MissingData
    })?;

    // The language is fixed here; a later /set_lang cannot change this order.
    let order = payload.into_order(state.language.get())?;
    state.session.checkout(order).await?;

    Ok(Json(MessageResponse::new("Checkout processed")))
}
