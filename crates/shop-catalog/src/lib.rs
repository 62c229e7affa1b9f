//! # shop-catalog
//!
//! Catalog storage and stock management for keyshop.
//!
//! The catalog is a single JSON document:
//!
//! ```text
//! category ──▶ product ──▶ { price, stock: [KEY1, KEY2, ...] }
//! ```
//!
//! Stock entries are opaque license keys handed out first-in-first-out.
//! Each key leaves the document the moment it is delivered, so a key is
//! never sold twice by a single process.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shop_catalog::{CatalogStore, JsonCatalogStore};
//!
//! let store = JsonCatalogStore::new("data/catalog.json");
//! if let Some(key) = store.take_key("Games", "Chess")? {
//!     // deliver key
//! }
//! ```

mod description;
mod model;
mod store;

pub use description::{DescriptionSource, DirectoryDescriptions, StaticDescriptions};
pub use model::{Catalog, Category, Product, StockLevel};
pub use store::{CatalogStore, JsonCatalogStore, MemoryCatalogStore};
