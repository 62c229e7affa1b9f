//! Chat Transport Strategy
//!
//! The controller talks to users only through this trait, so the same
//! conversation logic runs against Telegram, a test recorder, or any other
//! messenger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_core::transport::{ChatTransport, Keyboard, Button};
//!
//! let keyboard = Keyboard::single_column(vec![Button::callback("🏠 Home", "home")]);
//! transport.send_text(chat, "Welcome!", Some(&keyboard)).await?;
//! ```

mod mock;

pub use mock::{OutboundCall, RecordingTransport};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{ChatId, MessageId};

/// What pressing a button does
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    /// Sends the payload back as a callback event
    Callback(String),

    /// Opens an external link
    Url(String),
}

/// An inline button
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub action: ButtonAction,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    /// Callback payload, if this is a callback button
    pub fn data(&self) -> Option<&str> {
        match &self.action {
            ButtonAction::Callback(data) => Some(data),
            ButtonAction::Url(_) => None,
        }
    }
}

/// Inline keyboard layout: rows of buttons
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// One button per row
    pub fn single_column(buttons: Vec<Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    /// Append a row
    #[must_use]
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// All buttons in reading order
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Callback payloads in reading order
    pub fn callback_data(&self) -> Vec<&str> {
        self.buttons().filter_map(Button::data).collect()
    }
}

/// Strategy trait for chat transports
///
/// Implement this trait to connect the storefront to a new messenger.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a text message, optionally with an inline keyboard
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<&Keyboard>) -> Result<()>;

    /// Forward an existing message verbatim to another chat
    async fn forward(&self, to: ChatId, from_chat: ChatId, message: MessageId) -> Result<()>;

    /// Acknowledge a button press
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let _ = (callback_id, text);
        Ok(())
    }

    /// Transport name
    fn name(&self) -> &str;
}
