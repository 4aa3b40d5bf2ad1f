//! [`ActorEntity`] implementation for the chat session.
//!
//! The session owns the posted-order registry; the platform client is injected
//! as the actor's context.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::render::{category_name, channel_name, order_message, unique_name};
use super::SessionError;
use crate::framework::{ActorEntity, Handled};
use crate::model::{
    CheckoutReceipt, ComponentPress, InteractionReply, Language, Order, OrderAction, NO_PERMISSION,
};
use crate::platform::{
    ChatPlatform, InteractionToken, NewChannel, PermissionOverwrite, Permissions, Snowflake,
    CHANNEL_GUILD_CATEGORY, CHANNEL_GUILD_TEXT,
};

/// Guild-level settings read once at start-up.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub guild_id: Snowflake,
    /// Undecorated category name, e.g. `Orders`.
    pub category_name: String,
    /// The only user allowed to press the order buttons.
    pub manager_id: Snowflake,
}

/// Remembered so that button replies use the order's own language.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedOrder {
    pub buyer_id: Snowflake,
    pub language: Language,
    pub message_id: Snowflake,
}

#[derive(Debug)]
pub enum SessionRequest {
    Checkout(Order),
    Press(ComponentPress),
    /// Fill in an interaction that was answered with a deferred response.
    EditReply {
        interaction: InteractionToken,
        content: String,
    },
}

/// Variants match 1:1 with [`SessionRequest`].
#[derive(Debug)]
pub enum SessionReply {
    Checkout(CheckoutReceipt),
    Press(InteractionReply),
    Edited,
}

/// Channel changes performed after a button reply went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFollowUp {
    /// Hide the channel from everyone and stop members from posting.
    MarkDelivered(Snowflake),
    /// Delete the channel.
    Close(Snowflake),
}

/// State of the single chat-session actor.
pub struct ChatSession {
    settings: SessionSettings,
    orders: HashMap<Snowflake, PostedOrder>,
}

impl ChatSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            orders: HashMap::new(),
        }
    }

    /// Finds the order category by its decorated name, creating it when absent.
    ///
    /// Also returns the names of the text channels already inside it.
    async fn ensure_category(
        &self,
        platform: &dyn ChatPlatform,
    ) -> Result<(Snowflake, Vec<String>), SessionError> {
        let name = category_name(&self.settings.category_name);
        let channels = platform.guild_channels(self.settings.guild_id).await?;
        if let Some(existing) = channels
            .iter()
            .find(|c| c.kind == CHANNEL_GUILD_CATEGORY && c.name.as_deref() == Some(name.as_str()))
        {
            let taken = channels
                .iter()
                .filter(|c| c.kind == CHANNEL_GUILD_TEXT && c.parent_id == Some(existing.id))
                .filter_map(|c| c.name.clone())
                .collect();
            return Ok((existing.id, taken));
        }

        info!(category = %name, "Creating category");
        let created = platform
            .create_channel(
                self.settings.guild_id,
                &NewChannel {
                    name,
                    kind: CHANNEL_GUILD_CATEGORY,
                    parent_id: None,
                    permission_overwrites: Vec::new(),
                },
            )
            .await?;
        Ok((created.id, Vec::new()))
    }

    #[instrument(skip(self, order, platform), fields(buyer = %order.buyer_name))]
    async fn checkout(
        &mut self,
        order: Order,
        platform: &dyn ChatPlatform,
    ) -> Result<CheckoutReceipt, SessionError> {
        let guild = self.settings.guild_id;
        let manager_id = self.settings.manager_id;
        let buyer_id: Snowflake = order
            .buyer_id
            .parse()
            .map_err(|_| SessionError::InvalidSnowflake(order.buyer_id.clone()))?;

        let (category, taken) = self.ensure_category(platform).await?;

        // Either may be missing from the guild; the channel is still created.
        let buyer = platform.guild_member(guild, buyer_id).await?;
        let manager = platform.guild_member(guild, manager_id).await?;
        if buyer.is_none() {
            warn!(%buyer_id, "Buyer is not a guild member");
        }
        if manager.is_none() {
            warn!(%manager_id, "Manager is not a guild member");
        }

        let participant = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        let mut permission_overwrites = vec![PermissionOverwrite::role(
            guild,
            Permissions::NONE,
            Permissions::VIEW_CHANNEL,
        )];
        if buyer.is_some() {
            permission_overwrites.push(PermissionOverwrite::member(
                buyer_id,
                participant,
                Permissions::NONE,
            ));
        }
        if manager.is_some() {
            permission_overwrites.push(PermissionOverwrite::member(
                manager_id,
                participant,
                Permissions::NONE,
            ));
        }

        let name = unique_name(channel_name(&order), &taken);
        let channel = platform
            .create_channel(
                guild,
                &NewChannel {
                    name: name.clone(),
                    kind: CHANNEL_GUILD_TEXT,
                    parent_id: Some(category),
                    permission_overwrites,
                },
            )
            .await?;

        let message = platform
            .send_message(channel.id, &order_message(&order, manager_id))
            .await?;

        self.orders.insert(
            channel.id,
            PostedOrder {
                buyer_id,
                language: order.language,
                message_id: message.id,
            },
        );
        info!(channel_id = %channel.id, channel = %name, open_orders = self.orders.len(), "Order posted");

        Ok(CheckoutReceipt {
            channel_id: channel.id,
            channel_name: channel.name.unwrap_or(name),
            message_id: message.id,
        })
    }

    fn press(&self, press: ComponentPress) -> Handled<InteractionReply, OrderFollowUp> {
        if press.user_id != self.settings.manager_id {
            warn!(user_id = %press.user_id, action = %press.action, "Button press refused");
            return Handled::reply(InteractionReply::new(NO_PERMISSION));
        }

        let language = self
            .orders
            .get(&press.channel_id)
            .map_or(press.language, |posted| posted.language);
        let messages = language.messages();

        match press.action {
            OrderAction::Deliver => Handled::reply(InteractionReply::new(messages.delivered))
                .then(OrderFollowUp::MarkDelivered(press.channel_id)),
            OrderAction::Cancel => Handled::reply(InteractionReply::new(messages.cancelled))
                .then(OrderFollowUp::Close(press.channel_id)),
        }
    }

    async fn mark_delivered(
        &mut self,
        channel: Snowflake,
        platform: &dyn ChatPlatform,
    ) -> Result<(), SessionError> {
        platform
            .edit_overwrite(
                channel,
                &PermissionOverwrite::role(
                    self.settings.guild_id,
                    Permissions::NONE,
                    Permissions::VIEW_CHANNEL,
                ),
            )
            .await?;

        let current = platform.channel(channel).await?;
        for overwrite in current.permission_overwrites.iter().filter(|o| o.is_member()) {
            let locked = PermissionOverwrite::member(
                overwrite.id,
                overwrite.allow & !Permissions::SEND_MESSAGES,
                overwrite.deny | Permissions::SEND_MESSAGES,
            );
            platform.edit_overwrite(channel, &locked).await?;
        }
        self.close(channel);
        info!(channel_id = %channel, "Order delivered");
        Ok(())
    }

    /// Delivered and cancelled orders leave the registry.
    fn close(&mut self, channel: Snowflake) {
        self.orders.remove(&channel);
    }

    /// Orders posted since start-up and neither delivered nor cancelled.
    pub fn open_orders(&self) -> &HashMap<Snowflake, PostedOrder> {
        &self.orders
    }
}

#[async_trait]
impl ActorEntity for ChatSession {
    type Request = SessionRequest;
    type Reply = SessionReply;
    type FollowUp = OrderFollowUp;
    type Context = Arc<dyn ChatPlatform>;
    type Error = SessionError;

    async fn on_start(&mut self, platform: &Self::Context) -> Result<(), SessionError> {
        let user = platform.current_user().await?;
        info!(bot = %user.username, guild_id = %self.settings.guild_id, "Bot is ready");
        Ok(())
    }

    async fn handle(
        &mut self,
        request: SessionRequest,
        platform: &Self::Context,
    ) -> Result<Handled<SessionReply, OrderFollowUp>, SessionError> {
        match request {
            SessionRequest::Checkout(order) => {
                let receipt = self.checkout(order, platform.as_ref()).await?;
                Ok(Handled::reply(SessionReply::Checkout(receipt)))
            }
            SessionRequest::Press(press) => {
                let Handled { reply, follow_up } = self.press(press);
                Ok(Handled {
                    reply: SessionReply::Press(reply),
                    follow_up,
                })
            }
            SessionRequest::EditReply {
                interaction,
                content,
            } => {
                platform
                    .edit_original_response(&interaction, &content)
                    .await?;
                Ok(Handled::reply(SessionReply::Edited))
            }
        }
    }

    async fn follow_up(
        &mut self,
        work: OrderFollowUp,
        platform: &Self::Context,
    ) -> Result<(), SessionError> {
        match work {
            OrderFollowUp::MarkDelivered(channel) => {
                self.mark_delivered(channel, platform.as_ref()).await
            }
            OrderFollowUp::Close(channel) => {
                platform.delete_channel(channel).await?;
                self.close(channel);
                info!(channel_id = %channel, open_orders = self.orders.len(), "Order cancelled");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::FakePlatform;

    const GUILD: Snowflake = Snowflake(10);
    const MANAGER: Snowflake = Snowflake(20);
    const BUYER: Snowflake = Snowflake(123);

    fn session() -> ChatSession {
        ChatSession::new(SessionSettings {
            guild_id: GUILD,
            category_name: "Orders".to_string(),
            manager_id: MANAGER,
        })
    }

    fn order(language: Language) -> Order {
        Order::new("alice", "123", vec!["item1".into()], "9.99", language)
    }

    #[tokio::test]
    async fn test_checkout_registers_order() {
        let platform = FakePlatform::new();
        platform.add_members([BUYER, MANAGER]).await;
        let mut session = session();

        let receipt = session
            .checkout(order(Language::English), &platform)
            .await
            .unwrap();

        let posted = &session.open_orders()[&receipt.channel_id];
        assert_eq!(posted.buyer_id, BUYER);
        assert_eq!(posted.language, Language::English);
        assert_eq!(posted.message_id, receipt.message_id);
        assert!(receipt.channel_name.starts_with("order-alice-"));
    }

    #[tokio::test]
    async fn test_category_is_reused() {
        let platform = FakePlatform::new();
        let mut session = session();

        session.checkout(order(Language::Arabic), &platform).await.unwrap();
        session.checkout(order(Language::Arabic), &platform).await.unwrap();

        let categories: Vec<_> = platform
            .channels()
            .await
            .into_iter()
            .filter(|c| c.kind == CHANNEL_GUILD_CATEGORY)
            .collect();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_deref(), Some("✴|〔 Orders 〕|✴"));
    }

    #[tokio::test]
    async fn test_missing_members_get_no_overwrite() {
        let platform = FakePlatform::new();
        let mut session = session();

        let receipt = session
            .checkout(order(Language::English), &platform)
            .await
            .unwrap();

        let channel = platform.channel(receipt.channel_id).await.unwrap();
        assert_eq!(
            channel.permission_overwrites,
            vec![PermissionOverwrite::role(
                GUILD,
                Permissions::NONE,
                Permissions::VIEW_CHANNEL
            )]
        );
    }

    #[tokio::test]
    async fn test_invalid_buyer_id() {
        let platform = FakePlatform::new();
        let mut session = session();
        let mut bad = order(Language::English);
        bad.buyer_id = "not-a-number".into();

        let err = session.checkout(bad, &platform).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidSnowflake(id) if id == "not-a-number"));
        assert!(platform.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_same_second_orders_get_distinct_names() {
        let platform = FakePlatform::new();
        let mut session = session();
        let first = order(Language::English);
        let mut second = order(Language::English);
        second.placed_at = first.placed_at;

        let a = session.checkout(first, &platform).await.unwrap();
        let b = session.checkout(second, &platform).await.unwrap();

        assert_ne!(a.channel_name, b.channel_name);
        assert_eq!(b.channel_name, format!("{}-2", a.channel_name));
    }

    #[tokio::test]
    async fn test_delivered_order_leaves_registry() {
        let platform = FakePlatform::new();
        platform.add_members([BUYER, MANAGER]).await;
        let mut session = session();
        let receipt = session
            .checkout(order(Language::English), &platform)
            .await
            .unwrap();
        assert_eq!(session.open_orders().len(), 1);

        session
            .mark_delivered(receipt.channel_id, &platform)
            .await
            .unwrap();

        assert!(session.open_orders().is_empty());
        // The channel itself stays, locked.
        assert!(platform.channel(receipt.channel_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_edit_reply_reaches_platform() {
        let platform = Arc::new(FakePlatform::new());
        let ctx: Arc<dyn ChatPlatform> = platform.clone();
        let mut session = session();
        let interaction = InteractionToken {
            application_id: Snowflake(77),
            token: "tok".to_string(),
        };

        let handled = session
            .handle(
                SessionRequest::EditReply {
                    interaction: interaction.clone(),
                    content: "done".to_string(),
                },
                &ctx,
            )
            .await
            .unwrap();

        assert!(matches!(handled.reply, SessionReply::Edited));
        assert_eq!(platform.edits().await, vec![(interaction, "done".to_string())]);
    }

    #[test]
    fn test_press_by_non_manager_is_refused() {
        let session = session();
        let handled = session.press(ComponentPress {
            action: OrderAction::Cancel,
            channel_id: Snowflake(1),
            user_id: BUYER,
            language: Language::English,
        });
        assert_eq!(handled.reply.content, NO_PERMISSION);
        assert_eq!(handled.follow_up, None);
    }

    #[test]
    fn test_press_on_unknown_channel_uses_fallback_language() {
        let session = session();
        let handled = session.press(ComponentPress {
            action: OrderAction::Deliver,
            channel_id: Snowflake(1),
            user_id: MANAGER,
            language: Language::English,
        });
        assert_eq!(handled.reply.content, "✅ Order marked as delivered!");
        assert_eq!(
            handled.follow_up,
            Some(OrderFollowUp::MarkDelivered(Snowflake(1)))
        );
    }
}
