//! Catalog Storage
//!
//! The catalog lives in a single JSON document. It is read fully on (almost)
//! every interaction and rewritten fully whenever a key is handed out.

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use shop_core::{Result, ShopError};

use crate::model::Catalog;

/// Catalog storage trait
pub trait CatalogStore: Send + Sync {
    /// Read the whole catalog
    fn load(&self) -> Result<Catalog>;

    /// Overwrite the whole catalog
    fn save(&self, catalog: &Catalog) -> Result<()>;

    /// Pop the oldest key for a product and persist the shortened stock
    ///
    /// Returns `Ok(None)` without writing when the stock is empty.
    fn take_key(&self, category: &str, product: &str) -> Result<Option<String>> {
        let mut catalog = self.load()?;
        let Some(key) = catalog.product_mut(category, product)?.pop_key() else {
            return Ok(None);
        };

        self.save(&catalog)?;

        let remaining = catalog.product(category, product).map_or(0, |p| p.stock.len());
        tracing::info!(category, product, remaining, "Stock entry consumed");

        Ok(Some(key))
    }
}

fn storage_err(path: &Path, err: impl std::fmt::Display) -> ShopError {
    ShopError::Storage(format!("{}: {err}", path.display()))
}

fn poisoned<T>(_: T) -> ShopError {
    ShopError::Storage("catalog cache lock poisoned".into())
}

/// File-backed catalog store
///
/// Without a cache every `load` re-reads the file, so hand edits show up
/// immediately. With [`JsonCatalogStore::cached`] reads are served from
/// memory and refreshed on every write made through this store.
pub struct JsonCatalogStore {
    path: PathBuf,
    cache: Option<RwLock<Option<Catalog>>>,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    /// Store that serves reads from memory after the first load
    pub fn cached(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Some(RwLock::new(None)),
        }
    }

    fn read_file(&self) -> Result<Catalog> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| storage_err(&self.path, e))?;
        Catalog::from_json(&json).map_err(|e| storage_err(&self.path, e))
    }

    fn write_file(&self, catalog: &Catalog) -> Result<()> {
        let json = catalog.to_json_pretty()?;

        // Write beside the target then rename, so readers never see a torn file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|e| storage_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| storage_err(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "Catalog written");
        Ok(())
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<Catalog> {
        let Some(cache) = &self.cache else {
            return self.read_file();
        };

        if let Some(catalog) = cache.read().map_err(poisoned)?.as_ref() {
            return Ok(catalog.clone());
        }

        let catalog = self.read_file()?;
        *cache.write().map_err(poisoned)? = Some(catalog.clone());
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        self.write_file(catalog)?;

        if let Some(cache) = &self.cache {
            *cache.write().map_err(poisoned)? = Some(catalog.clone());
        }
        Ok(())
    }
}

/// In-memory catalog store (for tests and demos)
#[derive(Default)]
pub struct MemoryCatalogStore {
    catalog: RwLock<Catalog>,
    saves: AtomicUsize,
}

impl MemoryCatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Catalog> {
        Ok(self.catalog.read().map_err(poisoned)?.clone())
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        *self.catalog.write().map_err(poisoned)? = catalog.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use rust_decimal_macros::dec;

    const CHESS: &str = r#"{"Games":{"Chess":{"price":10,"stock":["KEY1","KEY2"]}}}"#;

    fn write_catalog(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_take_key_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(&dir, CHESS);
        let store = JsonCatalogStore::new(&path);

        assert_eq!(store.take_key("Games", "Chess").unwrap().as_deref(), Some("KEY1"));

        let on_disk = Catalog::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let chess = on_disk.product("Games", "Chess").unwrap();
        assert_eq!(chess.stock, vec!["KEY2".to_string()]);
        assert_eq!(chess.price, dec!(10));
        assert!(!dir.path().join("catalog.json.tmp").exists());
    }

    #[test]
    fn test_keys_never_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::new(write_catalog(&dir, CHESS));

        let first = store.take_key("Games", "Chess").unwrap();
        let second = store.take_key("Games", "Chess").unwrap();
        let third = store.take_key("Games", "Chess").unwrap();

        assert_eq!(first.as_deref(), Some("KEY1"));
        assert_eq!(second.as_deref(), Some("KEY2"));
        assert_eq!(third, None);
    }

    #[test]
    fn test_empty_stock_does_not_write() {
        let catalog = Catalog::new().with_product("Games", "Chess", Product::new(dec!(10)));
        let store = MemoryCatalogStore::new(catalog.clone());

        assert_eq!(store.take_key("Games", "Chess").unwrap(), None);
        assert_eq!(store.save_count(), 0);
        assert_eq!(store.load().unwrap(), catalog);
    }

    #[test]
    fn test_take_key_unknown_product() {
        let store = MemoryCatalogStore::new(Catalog::new());
        assert!(matches!(
            store.take_key("Games", "Chess"),
            Err(ShopError::NotFound(_))
        ));
    }

    #[test]
    fn test_uncached_store_sees_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(&dir, CHESS);
        let store = JsonCatalogStore::new(&path);

        assert_eq!(store.load().unwrap().product_names("Games").unwrap(), vec!["Chess"]);

        std::fs::write(&path, r#"{"Games":{"Go":{"price":5}}}"#).unwrap();
        assert_eq!(store.load().unwrap().product_names("Games").unwrap(), vec!["Go"]);
    }

    #[test]
    fn test_cached_store_refreshes_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_catalog(&dir, CHESS);
        let store = JsonCatalogStore::cached(&path);

        store.load().unwrap();
        std::fs::write(&path, r#"{"Games":{"Go":{"price":5}}}"#).unwrap();

        // served from memory
        assert_eq!(store.load().unwrap().product_names("Games").unwrap(), vec!["Chess"]);

        store.take_key("Games", "Chess").unwrap();
        let cached = store.load().unwrap();
        assert_eq!(cached.product("Games", "Chess").unwrap().stock.len(), 1);
    }

    #[test]
    fn test_missing_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.load(), Err(ShopError::Storage(_))));
    }
}
