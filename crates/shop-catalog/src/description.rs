//! Product Descriptions
//!
//! Descriptions are plain-text resources stored outside the catalog, one per
//! product name. A missing description never fails an interaction.

use std::collections::HashMap;
use std::path::PathBuf;

/// Source of product description text
pub trait DescriptionSource: Send + Sync {
    /// Description for a product, or `None` if there isn't one
    fn describe(&self, product: &str) -> Option<String>;
}

/// Reads `<dir>/<product>.txt`
pub struct DirectoryDescriptions {
    dir: PathBuf,
}

impl DirectoryDescriptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn is_safe_name(product: &str) -> bool {
        !matches!(product, "" | "." | "..") && !product.contains(['/', '\\', '\0'])
    }
}

impl DescriptionSource for DirectoryDescriptions {
    fn describe(&self, product: &str) -> Option<String> {
        if !Self::is_safe_name(product) {
            tracing::warn!(product, "Refusing to read description for unsafe product name");
            return None;
        }

        let path = self.dir.join(format!("{product}.txt"));
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No description file");
                None
            }
        }
    }
}

/// Fixed in-memory descriptions
#[derive(Default)]
pub struct StaticDescriptions {
    texts: HashMap<String, String>,
}

impl StaticDescriptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, product: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(product.into(), text.into());
        self
    }
}

impl DescriptionSource for StaticDescriptions {
    fn describe(&self, product: &str) -> Option<String> {
        self.texts.get(product).cloned()
    }
}
