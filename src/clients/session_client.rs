use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use crate::clients::actor_client::ActorClient;
use crate::framework::{BridgeClient, FrameworkError};
use crate::model::{CheckoutReceipt, ComponentPress, InteractionReply, Order};
use crate::platform::InteractionToken;
use crate::session_actor::{ChatSession, SessionError, SessionReply, SessionRequest};

/// Client for interacting with the chat-session actor.
#[derive(Clone)]
pub struct SessionClient {
    inner: BridgeClient<ChatSession>,
    timeout: Duration,
}

impl SessionClient {
    pub fn new(inner: BridgeClient<ChatSession>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Posts the order into a fresh private channel.
    #[instrument(skip(self, order), fields(buyer = %order.buyer_name, language = %order.language))]
    pub async fn checkout(&self, order: Order) -> Result<CheckoutReceipt, SessionError> {
        match self.request(SessionRequest::Checkout(order)).await? {
            SessionReply::Checkout(receipt) => {
                info!(channel = %receipt.channel_name, "Checkout processed");
                Ok(receipt)
            }
            _ => Err(SessionError::UnexpectedReply),
        }
    }

    /// Forwards a button press; the reply is ready before any channel change.
    #[instrument(skip(self), fields(action = %press.action, channel_id = %press.channel_id))]
    pub async fn press(&self, press: ComponentPress) -> Result<InteractionReply, SessionError> {
        match self.request(SessionRequest::Press(press)).await? {
            SessionReply::Press(reply) => Ok(reply),
            _ => Err(SessionError::UnexpectedReply),
        }
    }

    /// Replaces the placeholder of a deferred interaction response.
    #[instrument(skip(self, interaction, content))]
    pub async fn edit_reply(
        &self,
        interaction: InteractionToken,
        content: String,
    ) -> Result<(), SessionError> {
        let request = SessionRequest::EditReply {
            interaction,
            content,
        };
        match self.request(request).await? {
            SessionReply::Edited => Ok(()),
            _ => Err(SessionError::UnexpectedReply),
        }
    }
}

#[async_trait]
impl ActorClient<ChatSession> for SessionClient {
    type Error = SessionError;

    fn inner(&self) -> &BridgeClient<ChatSession> {
        &self.inner
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<SessionError>() {
                Ok(session) => *session,
                Err(other) => SessionError::ActorCommunicationError(other.to_string()),
            },
            other => SessionError::ActorCommunicationError(other.to_string()),
        }
    }
}
