//! # shop-core
//!
//! Core types for the keyshop storefront: chat identifiers, inbound events,
//! per-chat sessions and the transport abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   InboundEvent   ┌──────────────┐   ChatTransport   ┌──────────────┐
//! │  Transport   │─────────────────▶│  Controller  │──────────────────▶│  Transport   │
//! │  (polling)   │                  │ (storefront) │                   │  (send/fwd)  │
//! └──────────────┘                  └──────┬───────┘                   └──────────────┘
//!                                          │
//!                               ┌──────────┴──────────┐
//!                               │                     │
//!                        ┌──────▼───────┐     ┌───────▼──────┐
//!                        │ SessionStore │     │ CatalogStore │
//!                        └──────────────┘     └──────────────┘
//! ```
//!
//! The `ChatTransport` trait lets the same conversation logic run against
//! Telegram or a recording transport in tests.

pub mod error;
pub mod event;
pub mod session;
pub mod transport;

pub use error::{Result, ShopError};
pub use event::{ChatId, InboundEvent, MediaKind, MessageId};
pub use session::{ChatSession, MemorySessionStore, Selection, SessionStore, Stage};
pub use transport::{Button, ButtonAction, ChatTransport, Keyboard, OutboundCall, RecordingTransport};
