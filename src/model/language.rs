//! Display languages and the localization table.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

/// The two supported display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    Arabic,
    English,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("unsupported language: {0:?}")]
    Unsupported(String),
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Arabic, Language::English];

    pub fn code(self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::English => "en",
        }
    }

    /// The message templates for this language.
    pub fn messages(self) -> &'static MessageSet {
        match self {
            Self::Arabic => &ARABIC,
            Self::English => &ENGLISH,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::English,
            _ => Self::Arabic,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Arabic => 0,
            Self::English => 1,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ar" => Ok(Self::Arabic),
            "en" => Ok(Self::English),
            other => Err(LanguageError::Unsupported(other.to_string())),
        }
    }
}

/// The process-wide "current display language".
///
/// Read once when a checkout arrives and carried with the order, so a change
/// made while a checkout is in flight only affects later checkouts.
#[derive(Debug, Default)]
pub struct LanguageSetting(AtomicU8);

impl LanguageSetting {
    pub fn new(language: Language) -> Self {
        Self(AtomicU8::new(language.as_u8()))
    }

    pub fn get(&self) -> Language {
        Language::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, language: Language) {
        self.0.store(language.as_u8(), Ordering::Release);
    }
}

/// Every user-visible string for one language.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageSet {
    pub title: &'static str,
    /// Followed by the buyer mention.
    pub placed_by: &'static str,
    pub items_header: &'static str,
    pub no_items: &'static str,
    pub total_label: &'static str,
    pub footer: &'static str,
    pub delivered: &'static str,
    pub cancelled: &'static str,
    pub deliver_label: &'static str,
    pub cancel_label: &'static str,
}

impl MessageSet {
    pub fn description(&self, buyer_id: &str) -> String {
        format!("{}<@{}>", self.placed_by, buyer_id)
    }

    /// Header plus one `- item` line per entry, or the placeholder.
    pub fn items_block(&self, items: &[String]) -> String {
        let list = if items.is_empty() {
            self.no_items.to_string()
        } else {
            items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!("{}\n{}", self.items_header, list)
    }

    pub fn total_line(&self, total: &str) -> String {
        format!("{} {}$", self.total_label, total)
    }
}

/// Shown to anyone but the manager pressing an order button.
pub const NO_PERMISSION: &str = "🚫 You don't have permission.";

static ARABIC: MessageSet = MessageSet {
    title: "🛒 طلب جديد من المتجر",
    placed_by: "✅ تم تقديم طلب جديد من ",
    items_header: "**🧾 محتويات السلة:**",
    no_items: "لا توجد عناصر",
    total_label: "**💰 الإجمالي:**",
    footer: "Qotb STORE | تمت العملية",
    delivered: "✅ تم تسليم الطلب بنجاح!",
    cancelled: "❌ تم إلغاء الطلب.",
    deliver_label: "تم التسليم ✅",
    cancel_label: "إلغاء ❌",
};

static ENGLISH: MessageSet = MessageSet {
    title: "🛒 New Store Order",
    placed_by: "✅ A new order has been placed by ",
    items_header: "**🧾 Cart Items:**",
    no_items: "No items",
    total_label: "**💰 Total:**",
    footer: "Qotb STORE | Order Processed",
    delivered: "✅ Order marked as delivered!",
    cancelled: "❌ Order has been cancelled.",
    deliver_label: "Mark Delivered ✅",
    cancel_label: "Cancel ❌",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("ar".parse::<Language>(), Ok(Language::Arabic));
        assert_eq!("en".parse::<Language>(), Ok(Language::English));
        assert_eq!(
            "fr".parse::<Language>(),
            Err(LanguageError::Unsupported("fr".to_string()))
        );
        assert!("EN".parse::<Language>().is_err());
    }

    #[test]
    fn test_setting_round_trip() {
        let setting = LanguageSetting::default();
        assert_eq!(setting.get(), Language::Arabic);
        setting.set(Language::English);
        setting.set(Language::English);
        assert_eq!(setting.get(), Language::English);
    }

    #[test]
    fn test_every_language_defines_every_message() {
        for language in Language::ALL {
            let m = language.messages();
            for text in [
                m.title,
                m.placed_by,
                m.items_header,
                m.no_items,
                m.total_label,
                m.footer,
                m.delivered,
                m.cancelled,
                m.deliver_label,
                m.cancel_label,
            ] {
                assert!(!text.is_empty(), "{language} has an empty message");
            }
        }
    }

    #[test]
    fn test_items_block() {
        let en = Language::English.messages();
        assert_eq!(
            en.items_block(&["item1".into(), "item2".into()]),
            "**🧾 Cart Items:**\n- item1\n- item2"
        );
        assert_eq!(en.items_block(&[]), "**🧾 Cart Items:**\nNo items");
        assert_eq!(
            Language::Arabic.messages().items_block(&[]),
            "**🧾 محتويات السلة:**\nلا توجد عناصر"
        );
    }

    #[test]
    fn test_description_and_total() {
        let en = Language::English.messages();
        assert_eq!(
            en.description("123"),
            "✅ A new order has been placed by <@123>"
        );
        assert_eq!(en.total_line("9.99"), "**💰 Total:** 9.99$");
    }
}
