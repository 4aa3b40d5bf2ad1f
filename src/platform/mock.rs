//! # Fake Platform
//!
//! An in-memory guild implementing [`ChatPlatform`] for tests.
//!
//! Every call is appended to a log so tests can assert on the exact sequence
//! of platform operations. [`FakePlatform::fail_on`] makes one operation fail
//! with a 500 until cleared; [`FakePlatform::slow_on`] makes one operation
//! take a while before it answers.

use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

use super::types::*;
use super::{ChatPlatform, PlatformError};

#[derive(Default)]
struct Guild {
    channels: Vec<Channel>,
    members: HashSet<Snowflake>,
    messages: Vec<(Snowflake, OutgoingMessage)>,
    edits: Vec<(InteractionToken, String)>,
    calls: Vec<String>,
    next_id: u64,
    failing: Option<&'static str>,
    slow: Option<(&'static str, Duration)>,
}

impl Guild {
    fn record(&mut self, call: &'static str) -> Result<(), PlatformError> {
        self.calls.push(call.to_string());
        if self.failing == Some(call) {
            return Err(PlatformError::Api {
                status: 500,
                body: format!("injected failure in {call}"),
            });
        }
        Ok(())
    }

    fn allocate(&mut self) -> Snowflake {
        self.next_id += 1;
        Snowflake(1_000 + self.next_id)
    }

    fn channel_mut(&mut self, id: Snowflake) -> Result<&mut Channel, PlatformError> {
        self.channels
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PlatformError::Api {
                status: 404,
                body: "Unknown Channel".to_string(),
            })
    }
}

/// In-memory stand-in for a Discord guild.
#[derive(Default)]
pub struct FakePlatform {
    guild: Mutex<Guild>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers users as guild members.
    pub async fn add_members(&self, members: impl IntoIterator<Item = Snowflake>) {
        self.guild.lock().await.members.extend(members);
    }

    /// Pre-creates a channel (e.g. an existing category).
    pub async fn insert_channel(&self, channel: Channel) {
        self.guild.lock().await.channels.push(channel);
    }

    /// Makes the named operation (e.g. `"create_channel"`) fail; `None` clears it.
    pub async fn fail_on(&self, call: Option<&'static str>) {
        self.guild.lock().await.failing = call;
    }

    /// Delays the named operation before it answers; `None` clears it.
    pub async fn slow_on(&self, slow: Option<(&'static str, Duration)>) {
        self.guild.lock().await.slow = slow;
    }

    pub async fn channels(&self) -> Vec<Channel> {
        self.guild.lock().await.channels.clone()
    }

    pub async fn messages(&self) -> Vec<(Snowflake, OutgoingMessage)> {
        self.guild.lock().await.messages.clone()
    }

    /// Interaction responses edited after a deferred reply.
    pub async fn edits(&self) -> Vec<(InteractionToken, String)> {
        self.guild.lock().await.edits.clone()
    }

    pub async fn calls(&self) -> Vec<String> {
        self.guild.lock().await.calls.clone()
    }

    /// Sleeps if `call` is slowed (without holding the lock), then records it.
    async fn enter(&self, call: &'static str) -> Result<MutexGuard<'_, Guild>, PlatformError> {
        let delay = match self.guild.lock().await.slow {
            Some((slowed, delay)) if slowed == call => Some(delay),
            _ => None,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut guild = self.guild.lock().await;
        guild.record(call)?;
        Ok(guild)
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn current_user(&self) -> Result<User, PlatformError> {
        self.enter("current_user").await?;
        Ok(User {
            id: Snowflake(1),
            username: "relay-bot".to_string(),
        })
    }

    async fn guild_channels(&self, _guild: Snowflake) -> Result<Vec<Channel>, PlatformError> {
        let guild = self.enter("guild_channels").await?;
        Ok(guild.channels.clone())
    }

    async fn create_channel(
        &self,
        _guild: Snowflake,
        channel: &NewChannel,
    ) -> Result<Channel, PlatformError> {
        let mut guild = self.enter("create_channel").await?;
        let created = Channel {
            id: guild.allocate(),
            kind: channel.kind,
            name: Some(channel.name.clone()),
            parent_id: channel.parent_id,
            permission_overwrites: channel.permission_overwrites.clone(),
        };
        guild.channels.push(created.clone());
        Ok(created)
    }

    async fn guild_member(
        &self,
        _guild: Snowflake,
        user: Snowflake,
    ) -> Result<Option<Member>, PlatformError> {
        let guild = self.enter("guild_member").await?;
        Ok(guild.members.contains(&user).then(|| Member {
            user: Some(User {
                id: user,
                username: format!("member-{user}"),
            }),
        }))
    }

    async fn channel(&self, channel: Snowflake) -> Result<Channel, PlatformError> {
        let mut guild = self.enter("channel").await?;
        guild.channel_mut(channel).map(|c| c.clone())
    }

    async fn edit_overwrite(
        &self,
        channel: Snowflake,
        overwrite: &PermissionOverwrite,
    ) -> Result<(), PlatformError> {
        let mut guild = self.enter("edit_overwrite").await?;
        let channel = guild.channel_mut(channel)?;
        match channel
            .permission_overwrites
            .iter_mut()
            .find(|o| o.id == overwrite.id)
        {
            Some(existing) => *existing = overwrite.clone(),
            None => channel.permission_overwrites.push(overwrite.clone()),
        }
        Ok(())
    }

    async fn delete_channel(&self, channel: Snowflake) -> Result<(), PlatformError> {
        let mut guild = self.enter("delete_channel").await?;
        guild.channel_mut(channel)?;
        guild.channels.retain(|c| c.id != channel);
        Ok(())
    }

    async fn send_message(
        &self,
        channel: Snowflake,
        message: &OutgoingMessage,
    ) -> Result<Message, PlatformError> {
        let mut guild = self.enter("send_message").await?;
        guild.channel_mut(channel)?;
        let id = guild.allocate();
        guild.messages.push((channel, message.clone()));
        Ok(Message {
            id,
            channel_id: channel,
        })
    }

    async fn edit_original_response(
        &self,
        interaction: &InteractionToken,
        content: &str,
    ) -> Result<(), PlatformError> {
        let mut guild = self.enter("edit_original_response").await?;
        guild.edits.push((interaction.clone(), content.to_string()));
        Ok(())
    }
}
