//! Telegram Transport
//!
//! Implementation of `ChatTransport` over the Telegram Bot API, with a
//! long-polling loop that turns updates into `InboundEvent`s.

mod types;

pub use types::{ApiResponse, CallbackQuery, Chat, Document, Message, PhotoSize, Update, User};

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::mpsc;

use shop_core::{
    ButtonAction, ChatId, ChatTransport, InboundEvent, Keyboard, MessageId, Result, ShopError,
};

/// Telegram transport configuration
#[derive(Clone, Debug)]
pub struct TelegramConfig {
    /// Bot token from @BotFather
    pub bot_token: String,

    /// API base URL
    pub api_base: String,

    /// Long-poll timeout passed to `getUpdates`, in seconds
    pub poll_timeout_secs: u64,

    /// Pause after a failed poll, in seconds
    pub retry_delay_secs: u64,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: "https://api.telegram.org".into(),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
        }
    }

    pub fn from_env() -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| ShopError::Config("TELEGRAM_BOT_TOKEN not set".into()))?;

        let mut config = Self::new(token);
        if let Some(timeout) = std::env::var("TELEGRAM_POLL_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.poll_timeout_secs = timeout;
        }
        Ok(config)
    }
}

/// Telegram Bot API transport
pub struct TelegramTransport {
    client: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramTransport {
    /// Create from configuration
    pub fn from_config(config: TelegramConfig) -> Result<Self> {
        // HTTP timeout must outlast the long poll
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 15))
            .build()
            .map_err(|e| ShopError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(TelegramConfig::from_env()?)
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// POST a Bot API method and unwrap its `result`
    async fn call<T: DeserializeOwned>(&self, method: &str, body: &serde_json::Value) -> Result<T> {
        let response = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| ShopError::Transport(format!("{method} failed: {}", e.without_url())))?;

        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ShopError::Transport(format!("Invalid {method} response: {}", e.without_url())))?;

        if !body.ok {
            return Err(ShopError::Transport(format!(
                "{method} rejected: {}",
                body.description.unwrap_or_default()
            )));
        }

        body.result
            .ok_or_else(|| ShopError::Transport(format!("{method} returned no result")))
    }

    /// Get bot info
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({})).await
    }

    /// Fetch updates after `offset` using long polling
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": self.config.poll_timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Start the polling loop; events arrive on the returned stream
    pub fn start_polling(self: Arc<Self>) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut offset = 0;
            tracing::info!("Telegram polling loop started");

            loop {
                match self.get_updates(offset).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = offset.max(update.update_id + 1);

                            let Some(event) = update.to_event() else {
                                tracing::trace!(update_id = update.update_id, "Skipping update");
                                continue;
                            };
                            if tx.send(event).is_err() {
                                tracing::info!("Telegram polling stopped (receiver dropped)");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Telegram polling error");
                        tokio::time::sleep(Duration::from_secs(self.config.retry_delay_secs)).await;
                    }
                }
            }
        });

        EventStream { rx }
    }
}

/// Render a keyboard as Telegram `reply_markup`
pub fn inline_keyboard(keyboard: &Keyboard) -> serde_json::Value {
    let rows: Vec<Vec<serde_json::Value>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match &button.action {
                    ButtonAction::Callback(data) => json!({"text": button.label, "callback_data": data}),
                    ButtonAction::Url(url) => json!({"text": button.label, "url": url}),
                })
                .collect()
        })
        .collect();

    json!({ "inline_keyboard": rows })
}

/// Stream of inbound events from the polling loop
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<InboundEvent>,
}

impl Stream for EventStream {
    type Item = InboundEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat: ChatId, text: &str, keyboard: Option<&Keyboard>) -> Result<()> {
        let mut body = json!({
            "chat_id": chat.0,
            "text": text,
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = inline_keyboard(keyboard);
        }

        let _: serde_json::Value = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn forward(&self, to: ChatId, from_chat: ChatId, message: MessageId) -> Result<()> {
        let body = json!({
            "chat_id": to.0,
            "from_chat_id": from_chat.0,
            "message_id": message.0,
        });

        let _: serde_json::Value = self.call("forwardMessage", &body).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let mut body = json!({ "callback_query_id": callback_id });
        if let Some(text) = text {
            body["text"] = json!(text);
        }

        let _: bool = self.call("answerCallbackQuery", &body).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_core::Button;

    #[test]
    fn test_config_defaults() {
        let config = TelegramConfig::new("123:abc");
        assert_eq!(config.api_base, "https://api.telegram.org");
        assert_eq!(config.poll_timeout_secs, 30);
    }

    #[test]
    fn test_api_url() {
        let mut config = TelegramConfig::new("123:abc");
        config.api_base = "http://localhost:8081/".into();
        let transport = TelegramTransport::from_config(config).unwrap();

        assert_eq!(transport.api_url("getMe"), "http://localhost:8081/bot123:abc/getMe");
        assert_eq!(transport.name(), "telegram");
    }

    #[test]
    fn test_inline_keyboard_markup() {
        let keyboard = Keyboard::single_column(vec![Button::callback("Games", "cat:Games")])
            .row(vec![Button::url("Group", "https://t.me/keyshop")]);

        assert_eq!(
            inline_keyboard(&keyboard),
            json!({
                "inline_keyboard": [
                    [{"text": "Games", "callback_data": "cat:Games"}],
                    [{"text": "Group", "url": "https://t.me/keyshop"}],
                ]
            })
        );
    }
}
