//! Shop Configuration
//!
//! Static values substituted at startup: the admin identity, file
//! locations, payment account details and the external group link.

use std::path::PathBuf;

use shop_core::{ChatId, Result, ShopError};

use crate::payment::PaymentDetails;

/// Storefront configuration
#[derive(Clone, Debug)]
pub struct ShopConfig {
    /// The only identity allowed to approve deliveries; proofs are forwarded here
    pub admin: ChatId,

    /// Catalog JSON document
    pub catalog_path: PathBuf,

    /// Directory holding `<product>.txt` descriptions
    pub descriptions_dir: PathBuf,

    /// Serve catalog reads from memory between writes
    pub cache_catalog: bool,

    /// External group/bot link shown in the main menu
    pub group_link: Option<String>,

    /// Payment account details
    pub payments: PaymentDetails,
}

impl ShopConfig {
    /// Config with defaults for everything but the admin
    pub fn new(admin: ChatId) -> Self {
        Self {
            admin,
            catalog_path: PathBuf::from("data/catalog.json"),
            descriptions_dir: PathBuf::from("data/descriptions"),
            cache_catalog: false,
            group_link: None,
            payments: PaymentDetails::default(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let admin = get("SHOP_ADMIN_ID")
            .ok_or_else(|| ShopError::Config("SHOP_ADMIN_ID not set".into()))?
            .parse::<ChatId>()
            .map_err(|e| ShopError::Config(format!("SHOP_ADMIN_ID is not a chat id: {e}")))?;

        let mut config = Self::new(admin);

        if let Some(path) = get("SHOP_CATALOG_PATH") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(dir) = get("SHOP_DESCRIPTIONS_DIR") {
            config.descriptions_dir = PathBuf::from(dir);
        }
        config.cache_catalog = get("SHOP_CACHE_CATALOG")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"));
        config.group_link = get("SHOP_GROUP_LINK");

        let payments = &mut config.payments;
        for (key, field) in [
            ("SHOP_BANK_ACCOUNT", &mut payments.bank_account),
            ("SHOP_BANK_REFERENCE", &mut payments.bank_reference),
            ("SHOP_WALLET_CODE", &mut payments.wallet_code),
            ("SHOP_WALLET_REFERENCE", &mut payments.wallet_reference),
            ("SHOP_CRYPTO_ADDRESS", &mut payments.crypto_address),
            ("SHOP_CRYPTO_MEMO", &mut payments.crypto_memo),
        ] {
            if let Some(value) = get(key) {
                *field = value;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_admin_required() {
        let result = ShopConfig::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(ShopError::Config(_))));

        let result = ShopConfig::from_lookup(lookup(&[("SHOP_ADMIN_ID", "boss")]));
        assert!(matches!(result, Err(ShopError::Config(_))));
    }

    #[test]
    fn test_defaults() {
        let config = ShopConfig::from_lookup(lookup(&[("SHOP_ADMIN_ID", "555")])).unwrap();
        assert_eq!(config.admin, ChatId(555));
        assert_eq!(config.catalog_path, PathBuf::from("data/catalog.json"));
        assert!(!config.cache_catalog);
        assert!(config.group_link.is_none());
        assert_eq!(config.payments, PaymentDetails::default());
    }

    #[test]
    fn test_overrides() {
        let config = ShopConfig::from_lookup(lookup(&[
            ("SHOP_ADMIN_ID", "555"),
            ("SHOP_CATALOG_PATH", "/srv/shop/catalog.json"),
            ("SHOP_CACHE_CATALOG", "TRUE"),
            ("SHOP_GROUP_LINK", "https://t.me/keyshop_group"),
            ("SHOP_CRYPTO_ADDRESS", "TXYZ123"),
            ("SHOP_WALLET_CODE", "   "),
        ]))
        .unwrap();

        assert_eq!(config.catalog_path, PathBuf::from("/srv/shop/catalog.json"));
        assert!(config.cache_catalog);
        assert_eq!(config.group_link.as_deref(), Some("https://t.me/keyshop_group"));
        assert_eq!(config.payments.crypto_address, "TXYZ123");
        assert_eq!(config.payments.wallet_code, PaymentDetails::default().wallet_code);
    }
}
