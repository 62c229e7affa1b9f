//! Inbound Chat Events
//!
//! Transport-neutral representation of everything a chat can send us:
//! commands, button presses, media uploads and plain text.

use serde::{Deserialize, Serialize};

/// Chat/user identifier
///
/// In private chats the chat and the user share the same identifier, so a
/// single type keys both the per-chat session maps and the admin identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Identifier of a message within a chat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

/// Kind of attachment carried by a media message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Document,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Photo => write!(f, "photo"),
            Self::Document => write!(f, "document"),
        }
    }
}

/// An inbound event delivered by a chat transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// Slash command, e.g. `/start`
    Command {
        chat: ChatId,
        from: ChatId,
        /// Command name without the leading slash or `@botname` suffix
        name: String,
    },

    /// Inline button press
    Callback {
        /// Transport-specific id used to acknowledge the press
        id: String,
        chat: ChatId,
        from: ChatId,
        data: String,
    },

    /// Message carrying a photo or document attachment
    Media {
        chat: ChatId,
        from: ChatId,
        message_id: MessageId,
        kind: MediaKind,
    },

    /// Any other text message
    Text {
        chat: ChatId,
        from: ChatId,
        text: String,
    },
}

impl InboundEvent {
    /// Chat the event originated from
    pub const fn chat(&self) -> ChatId {
        match self {
            Self::Command { chat, .. }
            | Self::Callback { chat, .. }
            | Self::Media { chat, .. }
            | Self::Text { chat, .. } => *chat,
        }
    }

    /// Short label for logging
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::Callback { .. } => "callback",
            Self::Media { .. } => "media",
            Self::Text { .. } => "text",
        }
    }

    /// Parse a raw text message into a command or plain text event
    pub fn from_text(chat: ChatId, from: ChatId, text: &str) -> Self {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Self::Text {
                chat,
                from,
                text: text.to_string(),
            };
        };

        let head = rest.split_whitespace().next().unwrap_or(rest);
        // Group chats address commands as /start@SomeBot
        let name = head.split('@').next().unwrap_or(head);

        Self::Command {
            chat,
            from,
            name: name.to_lowercase(),
        }
    }
}
