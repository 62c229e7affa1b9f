//! Recording Transport
//!
//! For testing and demo purposes. Records every outbound call instead of
//! talking to a messenger.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ChatTransport, Keyboard};
use crate::error::{Result, ShopError};
use crate::event::{ChatId, MessageId};

/// A single outbound call captured by [`RecordingTransport`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundCall {
    Text {
        chat: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Forward {
        to: ChatId,
        from_chat: ChatId,
        message: MessageId,
    },
    CallbackAnswer {
        callback_id: String,
        text: Option<String>,
    },
}

/// Transport that records calls in order
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<OutboundCall>>,
    fail_sends: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose `send_text` always fails (for error-path tests)
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    /// All calls recorded so far
    pub async fn calls(&self) -> Vec<OutboundCall> {
        self.calls.lock().await.clone()
    }

    /// Drain recorded calls
    pub async fn take(&self) -> Vec<OutboundCall> {
        std::mem::take(&mut *self.calls.lock().await)
    }

    /// Texts (with keyboards) sent to a chat, in order
    pub async fn texts_to(&self, chat: ChatId) -> Vec<(String, Option<Keyboard>)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                OutboundCall::Text { chat: c, text, keyboard } if *c == chat => {
                    Some((text.clone(), keyboard.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Most recent text sent to a chat
    pub async fn last_text_to(&self, chat: ChatId) -> Option<(String, Option<Keyboard>)> {
        self.texts_to(chat).await.pop()
    }

    /// Forwards delivered to a chat
    pub async fn forwards_to(&self, chat: ChatId) -> Vec<(ChatId, MessageId)> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|call| match call {
                OutboundCall::Forward { to, from_chat, message } if *to == chat => {
                    Some((*from_chat, *message))
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<&Keyboard>) -> Result<()> {
        if self.fail_sends {
            return Err(ShopError::Transport("recording transport set to fail".into()));
        }

        self.calls.lock().await.push(OutboundCall::Text {
            chat,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn forward(&self, to: ChatId, from_chat: ChatId, message: MessageId) -> Result<()> {
        self.calls.lock().await.push(OutboundCall::Forward {
            to,
            from_chat,
            message,
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.calls.lock().await.push(OutboundCall::CallbackAnswer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
