//! # Chat Platform
//!
//! The seam between the session actor and Discord.
//!
//! [`ChatPlatform`] lists the handful of REST operations the relay needs.
//! [`DiscordRest`] implements them over HTTPS; [`mock::FakePlatform`] keeps an
//! in-memory guild for tests.

pub mod discord;
pub mod error;
pub mod mock;
pub mod types;

pub use discord::DiscordRest;
pub use error::PlatformError;
pub use types::*;

use async_trait::async_trait;

/// Operations the relay performs against the chat platform.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// The bot account behind the credential.
    async fn current_user(&self) -> Result<User, PlatformError>;

    async fn guild_channels(&self, guild: Snowflake) -> Result<Vec<Channel>, PlatformError>;

    async fn create_channel(
        &self,
        guild: Snowflake,
        channel: &NewChannel,
    ) -> Result<Channel, PlatformError>;

    /// Returns `None` when the user is not a member of the guild.
    async fn guild_member(
        &self,
        guild: Snowflake,
        user: Snowflake,
    ) -> Result<Option<Member>, PlatformError>;

    async fn channel(&self, channel: Snowflake) -> Result<Channel, PlatformError>;

    /// Create or replace one overwrite on a channel.
    async fn edit_overwrite(
        &self,
        channel: Snowflake,
        overwrite: &PermissionOverwrite,
    ) -> Result<(), PlatformError>;

    async fn delete_channel(&self, channel: Snowflake) -> Result<(), PlatformError>;

    async fn send_message(
        &self,
        channel: Snowflake,
        message: &OutgoingMessage,
    ) -> Result<Message, PlatformError>;

    /// Replace the placeholder left by a deferred interaction response.
    async fn edit_original_response(
        &self,
        interaction: &InteractionToken,
        content: &str,
    ) -> Result<(), PlatformError>;
}
