//! Telegram Bot API types
//!
//! Only the fields the storefront reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};

use shop_core::{ChatId, InboundEvent, MediaKind, MessageId};

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub caption: Option<String>,
    pub photo: Option<Vec<PhotoSize>>,
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub chat_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Update {
    /// Convert to a transport-neutral event; `None` for updates we ignore
    pub fn to_event(&self) -> Option<InboundEvent> {
        if let Some(query) = &self.callback_query {
            let from = ChatId(query.from.id);
            let chat = query.message.as_ref().map_or(from, |m| ChatId(m.chat.id));
            return Some(InboundEvent::Callback {
                id: query.id.clone(),
                chat,
                from,
                // Still acknowledged; an empty payload is ignored downstream
                data: query.data.clone().unwrap_or_default(),
            });
        }

        let msg = self.message.as_ref()?;
        let from = msg.from.as_ref()?;

        // Skip bot messages
        if from.is_bot {
            return None;
        }

        let chat = ChatId(msg.chat.id);
        let sender = ChatId(from.id);

        let kind = if msg.photo.as_ref().is_some_and(|p| !p.is_empty()) {
            Some(MediaKind::Photo)
        } else if msg.document.is_some() {
            Some(MediaKind::Document)
        } else {
            None
        };

        if let Some(kind) = kind {
            return Some(InboundEvent::Media {
                chat,
                from: sender,
                message_id: MessageId(msg.message_id),
                kind,
            });
        }

        msg.text
            .as_deref()
            .map(|text| InboundEvent::from_text(chat, sender, text))
    }
}
