//! Discord REST implementation of [`ChatPlatform`].
//!
//! One pooled `reqwest::Client` is shared by every call, so the session actor
//! keeps a warm connection to the API for its whole lifetime.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::types::*;
use super::{ChatPlatform, PlatformError};

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Authenticated Discord REST client.
///
/// API endpoint: `<base>/...` with header `Authorization: Bot <token>`.
#[derive(Clone)]
pub struct DiscordRest {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl std::fmt::Debug for DiscordRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token stays out of logs.
        f.debug_struct("DiscordRest")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl DiscordRest {
    /// Every call fails after `timeout`; the session actor is never parked on
    /// a request Discord does not answer.
    pub fn new(
        token: impl Into<String>,
        base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
            .build()?;

        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base, path))
            .header(AUTHORIZATION, format!("Bot {}", self.token))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, PlatformError> {
        let response = builder.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api { status, body });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PlatformError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, PlatformError> {
        let response = self.execute(self.request(method, path).json(body)).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatPlatform for DiscordRest {
    #[instrument(skip(self))]
    async fn current_user(&self) -> Result<User, PlatformError> {
        self.get_json("/users/@me").await
    }

    #[instrument(skip(self))]
    async fn guild_channels(&self, guild: Snowflake) -> Result<Vec<Channel>, PlatformError> {
        self.get_json(&format!("/guilds/{guild}/channels")).await
    }

    #[instrument(skip(self, channel), fields(name = %channel.name))]
    async fn create_channel(
        &self,
        guild: Snowflake,
        channel: &NewChannel,
    ) -> Result<Channel, PlatformError> {
        debug!(?channel, "Creating channel");
        self.send_json(Method::POST, &format!("/guilds/{guild}/channels"), channel)
            .await
    }

    #[instrument(skip(self))]
    async fn guild_member(
        &self,
        guild: Snowflake,
        user: Snowflake,
    ) -> Result<Option<Member>, PlatformError> {
        match self
            .get_json(&format!("/guilds/{guild}/members/{user}"))
            .await
        {
            Ok(member) => Ok(Some(member)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self))]
    async fn channel(&self, channel: Snowflake) -> Result<Channel, PlatformError> {
        self.get_json(&format!("/channels/{channel}")).await
    }

    #[instrument(skip(self))]
    async fn edit_overwrite(
        &self,
        channel: Snowflake,
        overwrite: &PermissionOverwrite,
    ) -> Result<(), PlatformError> {
        let body = serde_json::json!({
            "type": overwrite.kind,
            "allow": overwrite.allow,
            "deny": overwrite.deny,
        });
        let path = format!("/channels/{channel}/permissions/{}", overwrite.id);
        self.execute(self.request(Method::PUT, &path).json(&body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel: Snowflake) -> Result<(), PlatformError> {
        self.execute(self.request(Method::DELETE, &format!("/channels/{channel}")))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, message))]
    async fn send_message(
        &self,
        channel: Snowflake,
        message: &OutgoingMessage,
    ) -> Result<Message, PlatformError> {
        self.send_json(
            Method::POST,
            &format!("/channels/{channel}/messages"),
            message,
        )
        .await
    }

    #[instrument(skip(self, interaction, content), fields(application_id = %interaction.application_id))]
    async fn edit_original_response(
        &self,
        interaction: &InteractionToken,
        content: &str,
    ) -> Result<(), PlatformError> {
        let path = format!(
            "/webhooks/{}/{}/messages/@original",
            interaction.application_id, interaction.token
        );
        let body = serde_json::json!({ "content": content });
        self.execute(self.request(Method::PATCH, &path).json(&body))
            .await?;
        Ok(())
    }
}
