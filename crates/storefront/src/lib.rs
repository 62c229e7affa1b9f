//! # storefront
//!
//! Chat storefront for license keys: users browse categories, pick a
//! product, pay manually, send proof, and an admin approves delivery of a
//! key taken from the product's stock.
//!
//! ## Flow
//!
//! ```text
//! ┌────────┐  cat:  ┌──────────┐ prod: ┌─────────┐ pay: ┌──────────────┐
//! │  Idle  │───────▶│ Category │──────▶│ Product │─────▶│ AwaitingProof│
//! └────────┘        └──────────┘       └─────────┘      └──────┬───────┘
//!                                                              │ photo/document
//!                                                              ▼
//!                          ┌───────────┐  approve:<chat>  ┌──────────────────┐
//!                          │ Delivered │◀─────────────────│ AwaitingApproval │
//!                          └───────────┘    (admin only)  └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront::{Controller, ShopConfig};
//!
//! let controller = Controller::new(catalog, sessions, descriptions, transport, config);
//! while let Some(event) = events.next().await {
//!     controller.handle(event).await?;
//! }
//! ```

pub mod action;
pub mod config;
pub mod controller;
pub mod payment;
pub mod render;

pub use action::Action;
pub use config::ShopConfig;
pub use controller::Controller;
pub use payment::{PaymentDetails, PaymentMethod};
