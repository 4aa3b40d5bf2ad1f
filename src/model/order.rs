use chrono::{DateTime, Utc};
use std::fmt;

use crate::model::Language;
use crate::platform::Snowflake;

/// A storefront purchase on its way to becoming a private channel.
///
/// Never persisted: built from one `/checkout` request and dropped once the
/// order message is posted.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub buyer_name: String,
    /// Discord user id as sent by the storefront; parsed by the session.
    pub buyer_id: String,
    pub items: Vec<String>,
    /// Decimal amount, displayed verbatim.
    pub total: String,
    /// Captured when the request arrived.
    pub language: Language,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        buyer_name: impl Into<String>,
        buyer_id: impl Into<String>,
        items: Vec<String>,
        total: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            buyer_name: buyer_name.into(),
            buyer_id: buyer_id.into(),
            items,
            total: total.into(),
            language,
            placed_at: Utc::now(),
        }
    }
}

/// What the session reports back after posting an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub channel_id: Snowflake,
    pub channel_name: String,
    pub message_id: Snowflake,
}

/// The two buttons attached to every order message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Deliver,
    Cancel,
}

impl OrderAction {
    pub fn custom_id(self) -> &'static str {
        match self {
            Self::Deliver => "deliver",
            Self::Cancel => "cancel",
        }
    }

    pub fn from_custom_id(id: &str) -> Option<Self> {
        match id {
            "deliver" => Some(Self::Deliver),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.custom_id())
    }
}

/// A button press forwarded from the interactions endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentPress {
    pub action: OrderAction,
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    /// Global setting at receipt; used when the channel holds no known order.
    pub language: Language,
}

/// Text shown only to the user who pressed the button.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionReply {
    pub content: String,
}

impl InteractionReply {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
