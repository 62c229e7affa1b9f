//! Conversation Controller
//!
//! Drives a chat through the purchase flow:
//!
//! ```text
//! Idle ─▶ CategoryChosen ─▶ ProductChosen ─▶ AwaitingProof ─▶ AwaitingApproval ─▶ Delivered
//!  ▲            │                 │
//!  └── home ────┴─────────────────┘
//! ```
//!
//! Every inbound event is handled to completion before the next one; the
//! caller is expected to dispatch sequentially. NotFound, NoSelection and
//! OutOfStock are answered with a user-facing message. Storage and transport
//! failures propagate to the caller.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use shop_catalog::{CatalogStore, DescriptionSource};
use shop_core::{
    ChatId, ChatTransport, InboundEvent, MediaKind, MessageId, Result, Selection, SessionStore,
    ShopError, Stage,
};

use crate::action::Action;
use crate::config::ShopConfig;
use crate::payment::PaymentMethod;
use crate::render;

/// The storefront conversation controller
pub struct Controller {
    catalog: Arc<dyn CatalogStore>,
    sessions: Arc<dyn SessionStore>,
    descriptions: Arc<dyn DescriptionSource>,
    transport: Arc<dyn ChatTransport>,
    config: ShopConfig,
}

impl Controller {
    /// Create a new controller
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        sessions: Arc<dyn SessionStore>,
        descriptions: Arc<dyn DescriptionSource>,
        transport: Arc<dyn ChatTransport>,
        config: ShopConfig,
    ) -> Self {
        Self {
            catalog,
            sessions,
            descriptions,
            transport,
            config,
        }
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Handle one inbound event to completion
    pub async fn handle(&self, event: InboundEvent) -> Result<()> {
        let span = tracing::info_span!(
            "event",
            event_id = %Uuid::new_v4(),
            kind = event.kind(),
            chat = %event.chat(),
        );
        self.dispatch(event).instrument(span).await
    }

    async fn dispatch(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Command { chat, from, name, .. } => self.command(chat, from, &name).await,

            InboundEvent::Callback { id, chat, from, data } => {
                if let Err(e) = self.transport.answer_callback(&id, None).await {
                    tracing::warn!(error = %e, "Failed to acknowledge button press");
                }

                let Some(action) = Action::parse(&data) else {
                    tracing::debug!(data = %data, "Ignoring unrecognised button payload");
                    return Ok(());
                };
                self.action(chat, from, action).await
            }

            InboundEvent::Media { chat, message_id, kind, .. } => {
                self.submit_proof(chat, message_id, kind).await
            }

            InboundEvent::Text { chat, .. } => self.send(chat, render::TEXT_HINT).await,
        }
    }

    async fn command(&self, chat: ChatId, from: ChatId, name: &str) -> Result<()> {
        match name {
            "start" => self.main_menu(chat).await,
            "help" => {
                let text = render::help(self.config.group_link.as_deref());
                self.send(chat, &text).await
            }
            "stock" if self.is_admin(from) => {
                let levels = self.catalog.load()?.stock_levels();
                self.send(chat, &render::stock_report(&levels)).await
            }
            _ => self.send(chat, render::UNKNOWN_COMMAND).await,
        }
    }

    async fn action(&self, chat: ChatId, from: ChatId, action: Action) -> Result<()> {
        match action {
            Action::Home => self.main_menu(chat).await,
            Action::Category(name) => self.open_category(chat, name).await,
            Action::Product(name) => self.open_product(chat, name).await,
            Action::Payment(method) => self.payment_instructions(chat, method).await,
            Action::Approve(buyer) => self.approve(from, buyer).await,
        }
    }

    /// `Idle`: category menu; clears navigation but keeps the selection
    async fn main_menu(&self, chat: ChatId) -> Result<()> {
        let catalog = self.catalog.load()?;
        self.sessions.set_category(chat, None, Stage::Idle)?;

        let (text, keyboard) = render::main_menu(&catalog, self.config.group_link.as_deref());
        self.transport.send_text(chat, &text, Some(&keyboard)).await
    }

    /// `CategoryChosen`: list the category's products
    async fn open_category(&self, chat: ChatId, category: String) -> Result<()> {
        let catalog = self.catalog.load()?;
        let products = match catalog.product_names(&category) {
            Ok(products) => products,
            Err(e) => return self.reply_error(chat, e).await,
        };

        let (text, keyboard) = render::category_menu(&category, &products);
        self.sessions.set_category(chat, Some(category), Stage::CategoryChosen)?;

        self.transport.send_text(chat, &text, Some(&keyboard)).await
    }

    /// `ProductChosen`: resolve the product under the current category
    async fn open_product(&self, chat: ChatId, product: String) -> Result<()> {
        let not_found = || ShopError::NotFound(format!("Product '{product}'"));

        let Some(category) = self.sessions.category(chat)? else {
            return self.reply_error(chat, not_found()).await;
        };

        let catalog = self.catalog.load()?;
        let Ok(item) = catalog.product(&category, &product) else {
            return self.reply_error(chat, not_found()).await;
        };

        let selection = Selection::new(category, product.clone());
        let description = self.descriptions.describe(&product);
        let (text, keyboard) = render::product_view(&selection, item, description.as_deref());

        tracing::info!(category = %selection.category, product = %selection.product, "Product selected");
        self.sessions.select(chat, selection)?;

        self.transport.send_text(chat, &text, Some(&keyboard)).await
    }

    /// `AwaitingProof`: static instructions, informational only
    async fn payment_instructions(&self, chat: ChatId, method: PaymentMethod) -> Result<()> {
        let selection = self.sessions.selection(chat)?;

        let price = match &selection {
            Some(sel) => self
                .catalog
                .load()?
                .product(&sel.category, &sel.product)
                .ok()
                .map(|p| p.price),
            None => None,
        };

        if selection.is_some() {
            self.sessions.set_stage(chat, Stage::AwaitingProof)?;
        }

        let order = selection.as_ref().zip(price);
        let text = self.config.payments.instructions(method, order);
        self.send(chat, &text).await
    }

    /// Forward a payment proof to the admin with an approve button
    async fn submit_proof(&self, chat: ChatId, message_id: MessageId, kind: MediaKind) -> Result<()> {
        let Some(selection) = self.sessions.selection(chat)? else {
            tracing::debug!("Proof received without a selection, not forwarding");
            return self.reply_error(chat, ShopError::NoSelection).await;
        };

        let admin = self.config.admin;
        self.transport.forward(admin, chat, message_id).await?;

        let (notice, keyboard) = render::proof_notice(chat, &selection, kind);
        self.transport.send_text(admin, &notice, Some(&keyboard)).await?;

        self.sessions.set_stage(chat, Stage::AwaitingApproval)?;
        tracing::info!(product = %selection.product, %kind, "Payment proof forwarded to admin");

        self.send(chat, render::PROOF_RECEIVED).await
    }

    /// Admin approval: pop one key and deliver it to the buyer
    ///
    /// Presses by anyone but the admin, and approvals for chats without a
    /// selection, are silently ignored.
    async fn approve(&self, from: ChatId, buyer: ChatId) -> Result<()> {
        if !self.is_admin(from) {
            tracing::warn!(%from, "Approval attempted by non-admin");
            return Ok(());
        }

        let Some(selection) = self.sessions.selection(buyer)? else {
            tracing::info!(%buyer, "Approval for chat without a selection ignored");
            return Ok(());
        };

        let key = match self.catalog.take_key(&selection.category, &selection.product) {
            Ok(key) => key,
            Err(ShopError::NotFound(what)) => {
                tracing::info!(%buyer, %what, "Approval for product no longer in catalog ignored");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let Some(key) = key else {
            tracing::warn!(%buyer, product = %selection.product, "Approval with empty stock");
            let err = ShopError::OutOfStock {
                category: selection.category,
                product: selection.product,
            };
            return self.reply_error(buyer, err).await;
        };

        self.transport
            .send_text(buyer, &render::key_delivery(&selection.product, &key), None)
            .await?;
        self.sessions.set_stage(buyer, Stage::Delivered)?;

        tracing::info!(%buyer, product = %selection.product, "Key delivered");
        Ok(())
    }

    fn is_admin(&self, chat: ChatId) -> bool {
        chat == self.config.admin
    }

    async fn send(&self, chat: ChatId, text: &str) -> Result<()> {
        self.transport.send_text(chat, text, None).await
    }

    /// Answer taxonomy errors with a message; propagate everything else
    async fn reply_error(&self, chat: ChatId, err: ShopError) -> Result<()> {
        if !err.is_user_facing() {
            return Err(err);
        }
        tracing::debug!(error = %err, "Answering with user-facing error");
        self.send(chat, &err.user_message()).await
    }
}
