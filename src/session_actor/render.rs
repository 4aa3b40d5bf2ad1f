//! Turning an [`Order`] into Discord payloads.

use crate::model::{Order, OrderAction};
use crate::platform::{
    ActionRow, Button, Embed, EmbedField, EmbedFooter, EmbedImage, OutgoingMessage, Snowflake,
    BUTTON_DANGER, BUTTON_SUCCESS, COMPONENT_ACTION_ROW, COMPONENT_BUTTON,
};

pub const EMBED_COLOR: u32 = 0x00B2FF;

pub const THUMBNAIL_URL: &str = "https://media.giphy.com/media/v1.Y2lkPTc5MGI3NjExZmIwZTE2dGRyYmNsZnRiaTYyMGRna2Z2ZTFzZmE0dDJhajF6cHF6ZCZlcD12MV9naWZzX3NlYXJjaCZjdD1n/3o7TKWGE1ZKs1mXFW4/giphy.gif";

const ZERO_WIDTH_SPACE: &str = "\u{200b}";

const MAX_SLUG_LEN: usize = 80;

/// Display name of the category holding every order channel.
pub fn category_name(configured: &str) -> String {
    format!("✴|〔 {configured} 〕|✴")
}

/// `order-<slug>-<yymmddHHMMSS>`. Two orders from one buyer in the same second
/// share this name; see [`unique_name`].
pub fn channel_name(order: &Order) -> String {
    format!(
        "order-{}-{}",
        slugify(&order.buyer_name),
        order.placed_at.format("%y%m%d%H%M%S")
    )
}

/// `base`, or `base-2`, `base-3`, ... when an earlier channel holds the name.
pub fn unique_name(base: String, taken: &[String]) -> String {
    if !taken.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Lowercase, `-` separated, at most 80 chars; `buyer` when nothing survives.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() || ch == '_' {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "buyer".to_string()
    } else {
        slug.to_string()
    }
}

pub fn order_embed(order: &Order) -> Embed {
    let messages = order.language.messages();
    Embed {
        title: messages.title.to_string(),
        description: messages.description(&order.buyer_id),
        color: EMBED_COLOR,
        timestamp: order.placed_at.to_rfc3339(),
        fields: vec![
            EmbedField {
                name: messages.items_block(&order.items),
                value: ZERO_WIDTH_SPACE.to_string(),
                inline: false,
            },
            EmbedField {
                name: messages.total_line(&order.total),
                value: ZERO_WIDTH_SPACE.to_string(),
                inline: false,
            },
        ],
        thumbnail: EmbedImage {
            url: THUMBNAIL_URL.to_string(),
        },
        footer: EmbedFooter {
            text: messages.footer.to_string(),
        },
    }
}

pub fn order_buttons(order: &Order) -> ActionRow {
    let messages = order.language.messages();
    let button = |action: OrderAction, style: u8, label: &str| Button {
        kind: COMPONENT_BUTTON,
        style,
        label: label.to_string(),
        custom_id: action.custom_id().to_string(),
    };
    ActionRow {
        kind: COMPONENT_ACTION_ROW,
        components: vec![
            button(OrderAction::Deliver, BUTTON_SUCCESS, messages.deliver_label),
            button(OrderAction::Cancel, BUTTON_DANGER, messages.cancel_label),
        ],
    }
}

/// The full order message: mentions, embed and buttons.
pub fn order_message(order: &Order, manager: Snowflake) -> OutgoingMessage {
    OutgoingMessage {
        content: format!("<@{}> <@{}>", order.buyer_id, manager),
        embeds: vec![order_embed(order)],
        components: vec![order_buttons(order)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use chrono::TimeZone;

    fn order(name: &str, items: &[&str], language: Language) -> Order {
        let mut order = Order::new(
            name,
            "123",
            items.iter().map(|s| s.to_string()).collect(),
            "9.99",
            language,
        );
        order.placed_at = chrono::Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        order
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("alice"), "alice");
        assert_eq!(slugify("Bob Smith!!"), "bob-smith");
        assert_eq!(slugify("  --x__y--  "), "x__y");
        assert_eq!(slugify("???"), "buyer");
        assert_eq!(slugify("محمد علي"), "محمد-علي");
        assert_eq!(slugify(&"a".repeat(200)).len(), 80);
    }

    #[test]
    fn test_channel_name_has_timestamp_suffix() {
        let order = order("Alice", &[], Language::English);
        assert_eq!(channel_name(&order), "order-alice-260304050607");
    }

    #[test]
    fn test_unique_name_appends_counter() {
        let taken = vec!["order-a-1".to_string(), "order-a-1-2".to_string()];
        assert_eq!(unique_name("order-b-1".into(), &taken), "order-b-1");
        assert_eq!(unique_name("order-a-1".into(), &taken), "order-a-1-3");
        assert_eq!(unique_name("order-a-1".into(), &[]), "order-a-1");
    }

    #[test]
    fn test_category_name_decoration() {
        assert_eq!(category_name("Orders"), "✴|〔 Orders 〕|✴");
    }

    #[test]
    fn test_embed_lists_items_and_total() {
        let embed = order_embed(&order("alice", &["item1", "item2"], Language::English));
        assert_eq!(embed.title, "🛒 New Store Order");
        assert_eq!(embed.color, 0x00B2FF);
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "**🧾 Cart Items:**\n- item1\n- item2");
        assert_eq!(embed.fields[1].name, "**💰 Total:** 9.99$");
        assert_eq!(embed.fields[0].value, "\u{200b}");
        assert_eq!(embed.footer.text, "Qotb STORE | Order Processed");
        assert!(embed.timestamp.starts_with("2026-03-04T05:06:07"));
    }

    #[test]
    fn test_arabic_buttons_and_placeholder() {
        let order = order("bob", &[], Language::Arabic);
        let embed = order_embed(&order);
        assert!(embed.fields[0].name.ends_with("لا توجد عناصر"));

        let row = order_buttons(&order);
        assert_eq!(row.components[0].custom_id, "deliver");
        assert_eq!(row.components[0].style, BUTTON_SUCCESS);
        assert_eq!(row.components[0].label, "تم التسليم ✅");
        assert_eq!(row.components[1].custom_id, "cancel");
        assert_eq!(row.components[1].style, BUTTON_DANGER);
    }

    #[test]
    fn test_message_mentions_buyer_and_manager() {
        let message = order_message(&order("alice", &[], Language::English), Snowflake(77));
        assert_eq!(message.content, "<@123> <@77>");
        assert_eq!(message.embeds.len(), 1);
        assert_eq!(message.components.len(), 1);
    }
}
