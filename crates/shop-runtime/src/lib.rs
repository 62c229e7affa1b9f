//! # shop-runtime
//!
//! Chat transports for the keyshop storefront.
//!
//! ## Transports
//!
//! - **Telegram** (default): Bot API over HTTPS with long polling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_runtime::telegram::TelegramTransport;
//!
//! let transport = Arc::new(TelegramTransport::from_env()?);
//! let mut events = transport.clone().start_polling();
//! while let Some(event) = events.next().await {
//!     controller.handle(event).await?;
//! }
//! ```

#[cfg(feature = "telegram")]
pub mod telegram;

#[cfg(feature = "telegram")]
pub use telegram::{EventStream, TelegramConfig, TelegramTransport};

// Re-export core types for convenience
pub use shop_core::{ChatTransport, InboundEvent, Result, ShopError};
