//! `POST /set_lang`: switch the display language for later orders.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{ApiError, AppState, MessageResponse};
use crate::model::Language;

#[derive(Debug, Default, Deserialize)]
pub struct LanguagePayload {
    #[serde(default)]
    pub lang: Option<Value>,
}

impl LanguagePayload {
    /// Absent or `null` means Arabic.
    pub fn language(&self) -> Result<Language, ApiError> {
        match &self.lang {
            None | Some(Value::Null) => Ok(Language::default()),
            Some(Value::String(code)) => code.parse().map_err(|_| ApiError::InvalidLanguage),
            Some(_) => Err(ApiError::InvalidLanguage),
        }
    }
}

#[instrument(skip_all)]
pub async fn set_lang_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LanguagePayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::InvalidLanguage)?;
    let language = payload.language()?;

    state.language.set(language);
    info!(%language, "Language changed");

    Ok(Json(MessageResponse::new(format!("Language set to {language}"))))
}
