//! Button Actions
//!
//! Inline buttons carry a compact payload that comes back verbatim when the
//! button is pressed:
//!
//! | payload              | meaning                               |
//! |----------------------|---------------------------------------|
//! | `home`               | back to the category menu             |
//! | `cat:<category>`     | open a category                       |
//! | `prod:<product>`     | open a product in the current category|
//! | `pay:<method>`       | show payment instructions             |
//! | `approve:<chat id>`  | admin approves that chat's purchase   |
//!
//! Telegram caps callback payloads at 64 bytes, which bounds the length of
//! category and product names usable as buttons.

use shop_core::ChatId;

use crate::payment::PaymentMethod;

/// A decoded button press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Home,
    Category(String),
    Product(String),
    Payment(PaymentMethod),
    Approve(ChatId),
}

impl Action {
    /// Decode a callback payload; `None` for anything we didn't issue
    pub fn parse(data: &str) -> Option<Self> {
        if data == "home" {
            return Some(Self::Home);
        }

        let (tag, value) = data.split_once(':')?;
        match tag {
            "cat" if !value.is_empty() => Some(Self::Category(value.to_string())),
            "prod" if !value.is_empty() => Some(Self::Product(value.to_string())),
            "pay" => value.parse().ok().map(Self::Payment),
            "approve" => value.parse().ok().map(Self::Approve),
            _ => None,
        }
    }

    /// Encode as a callback payload
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Category(name) => write!(f, "cat:{name}"),
            Self::Product(name) => write!(f, "prod:{name}"),
            Self::Payment(method) => write!(f, "pay:{}", method.as_str()),
            Self::Approve(chat) => write!(f, "approve:{chat}"),
        }
    }
}
