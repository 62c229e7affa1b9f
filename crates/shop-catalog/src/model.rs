//! Catalog Model
//!
//! The catalog document maps category → product → {price, stock}. Product
//! descriptions are stored outside the document and keyed by product name.
//!
//! ```json
//! {
//!   "Games": {
//!     "Chess": { "price": 10, "stock": ["KEY1", "KEY2"] }
//!   }
//! }
//! ```
//!
//! Prices use `rust_decimal` and are written back as JSON numbers.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use shop_core::{Result, ShopError};

/// Products within one category, in document order
pub type Category = IndexMap<String, Product>;

/// A sellable product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Redeemable license keys, consumed front to back
    #[serde(default)]
    pub stock: VecDeque<String>,

    /// Fields we don't interpret, kept so rewrites don't drop them
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            stock: VecDeque::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Builder: seed stock keys
    #[must_use]
    pub fn with_stock<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stock = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_stock(&self) -> bool {
        !self.stock.is_empty()
    }

    /// Remove and return the oldest key
    pub fn pop_key(&mut self) -> Option<String> {
        self.stock.pop_front()
    }
}

/// Remaining stock for one product (never includes the keys)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub category: String,
    pub product: String,
    pub price: Decimal,
    pub remaining: usize,
}

/// The whole catalog document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    categories: IndexMap<String, Category>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as a pretty-printed document
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder: add a product (creating the category if needed)
    #[must_use]
    pub fn with_product(
        mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        product: Product,
    ) -> Self {
        self.insert(category, name, product);
        self
    }

    /// Insert or replace a product
    pub fn insert(&mut self, category: impl Into<String>, name: impl Into<String>, product: Product) {
        self.categories
            .entry(category.into())
            .or_default()
            .insert(name.into(), product);
    }

    /// Category names in document order
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.get(name)
    }

    /// Product names under a category, in document order
    pub fn product_names(&self, category: &str) -> Result<Vec<&str>> {
        self.category(category)
            .map(|products| products.keys().map(String::as_str).collect())
            .ok_or_else(|| ShopError::NotFound(format!("Category '{category}'")))
    }

    pub fn product(&self, category: &str, product: &str) -> Result<&Product> {
        self.categories
            .get(category)
            .and_then(|products| products.get(product))
            .ok_or_else(|| ShopError::NotFound(format!("Product '{product}'")))
    }

    pub fn product_mut(&mut self, category: &str, product: &str) -> Result<&mut Product> {
        self.categories
            .get_mut(category)
            .and_then(|products| products.get_mut(product))
            .ok_or_else(|| ShopError::NotFound(format!("Product '{product}'")))
    }

    /// Remaining stock per product, in document order
    pub fn stock_levels(&self) -> Vec<StockLevel> {
        self.categories
            .iter()
            .flat_map(|(category, products)| {
                products.iter().map(move |(name, product)| StockLevel {
                    category: category.clone(),
                    product: name.clone(),
                    price: product.price,
                    remaining: product.stock.len(),
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "Games": {
            "Chess": {"price": 10, "stock": ["KEY1", "KEY2"]},
            "Go": {"price": 12.5, "stock": [], "note": "boxed edition"}
        },
        "Apps": {
            "Editor": {"price": 30}
        }
    }"#;

    #[test]
    fn test_parse_preserves_order() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.category_names().collect::<Vec<_>>(), vec!["Games", "Apps"]);
        assert_eq!(catalog.product_names("Games").unwrap(), vec!["Chess", "Go"]);
    }

    #[test]
    fn test_prices_are_decimal() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.product("Games", "Chess").unwrap().price, dec!(10));
        assert_eq!(catalog.product("Games", "Go").unwrap().price, dec!(12.5));
    }

    #[test]
    fn test_missing_stock_defaults_empty() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert!(!catalog.product("Apps", "Editor").unwrap().in_stock());
    }

    #[test]
    fn test_unknown_fields_survive_rewrite() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let rewritten = Catalog::from_json(&catalog.to_json_pretty().unwrap()).unwrap();

        let go = rewritten.product("Games", "Go").unwrap();
        assert_eq!(go.extra.get("note").and_then(|v| v.as_str()), Some("boxed edition"));
        assert_eq!(rewritten, catalog);
    }

    #[test]
    fn test_pop_key_is_fifo() {
        let mut product = Product::new(dec!(10)).with_stock(["KEY1", "KEY2"]);
        assert_eq!(product.pop_key().as_deref(), Some("KEY1"));
        assert_eq!(product.pop_key().as_deref(), Some("KEY2"));
        assert_eq!(product.pop_key(), None);
    }

    #[test]
    fn test_lookup_errors() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert!(matches!(catalog.product_names("Movies"), Err(ShopError::NotFound(_))));
        assert!(matches!(catalog.product("Games", "Poker"), Err(ShopError::NotFound(_))));
        assert!(matches!(catalog.product("Apps", "Chess"), Err(ShopError::NotFound(_))));
    }

    #[test]
    fn test_stock_levels() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        let levels = catalog.stock_levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].product, "Chess");
        assert_eq!(levels[0].remaining, 2);
        assert_eq!(levels[2].remaining, 0);
    }
}
