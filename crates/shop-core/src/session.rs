//! Session Management
//!
//! Volatile per-chat conversation state: the current navigation category,
//! the last selected product, and an informational stage label.
//!
//! Sessions live in process memory only and are lost on restart. The store
//! is injected into the controller so every test gets a fresh one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, ShopError};
use crate::event::ChatId;

/// Where a chat currently is in the purchase flow
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Idle,
    CategoryChosen,
    ProductChosen,
    AwaitingProof,
    AwaitingApproval,
    Delivered,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::CategoryChosen => "category_chosen",
            Self::ProductChosen => "product_chosen",
            Self::AwaitingProof => "awaiting_proof",
            Self::AwaitingApproval => "awaiting_approval",
            Self::Delivered => "delivered",
        };
        f.write_str(label)
    }
}

/// The last product a chat navigated into
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub category: String,
    pub product: String,
}

impl Selection {
    pub fn new(category: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            product: product.into(),
        }
    }
}

/// Per-chat conversation state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatSession {
    /// Category currently being browsed (navigation state)
    pub category: Option<String>,

    /// Last product selected; survives returning to the main menu
    pub selection: Option<Selection>,

    /// Informational flow stage
    pub stage: Stage,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            category: None,
            selection: None,
            stage: Stage::Idle,
            updated_at: Utc::now(),
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session store trait
///
/// Both the navigation category and the selection are keyed by chat.
/// Implementations need no cross-call atomicity: events are dispatched one
/// at a time.
pub trait SessionStore: Send + Sync {
    /// Snapshot of a chat's session, if it has one
    fn get(&self, chat: ChatId) -> Result<Option<ChatSession>>;

    /// Apply a mutation to a chat's session, creating it on first use
    fn update(&self, chat: ChatId, apply: &mut dyn FnMut(&mut ChatSession)) -> Result<()>;

    /// Number of chats with a session
    fn len(&self) -> Result<usize>;

    /// Current navigation category
    fn category(&self, chat: ChatId) -> Result<Option<String>> {
        Ok(self.get(chat)?.and_then(|s| s.category))
    }

    /// Current selection
    fn selection(&self, chat: ChatId) -> Result<Option<Selection>> {
        Ok(self.get(chat)?.and_then(|s| s.selection))
    }

    /// Current stage (`Idle` for unknown chats)
    fn stage(&self, chat: ChatId) -> Result<Stage> {
        Ok(self.get(chat)?.map_or(Stage::Idle, |s| s.stage))
    }

    /// Set or clear the navigation category
    fn set_category(&self, chat: ChatId, category: Option<String>, stage: Stage) -> Result<()> {
        self.update(chat, &mut |session| {
            session.category.clone_from(&category);
            session.stage = stage;
        })
    }

    /// Record a product selection
    fn select(&self, chat: ChatId, selection: Selection) -> Result<()> {
        self.update(chat, &mut |session| {
            session.selection = Some(selection.clone());
            session.stage = Stage::ProductChosen;
        })
    }

    /// Move a chat to a new stage without touching its selection
    fn set_stage(&self, chat: ChatId, stage: Stage) -> Result<()> {
        self.update(chat, &mut |session| session.stage = stage)
    }
}

/// In-memory session store
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<ChatId, ChatSession>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned<T>(_: T) -> ShopError {
    ShopError::Other("session store lock poisoned".into())
}

impl SessionStore for MemorySessionStore {
    fn get(&self, chat: ChatId) -> Result<Option<ChatSession>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(&chat).cloned())
    }

    fn update(&self, chat: ChatId, apply: &mut dyn FnMut(&mut ChatSession)) -> Result<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let session = sessions.entry(chat).or_default();
        apply(session);
        session.touch();
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().map_err(poisoned)?.len())
    }
}
