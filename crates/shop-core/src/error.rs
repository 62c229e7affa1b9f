//! Error Types

use thiserror::Error;

/// Result type alias for shop operations
pub type Result<T> = std::result::Result<T, ShopError>;

/// Shop error types
#[derive(Error, Debug)]
pub enum ShopError {
    /// Category or product absent from the catalog
    #[error("Not found: {0}")]
    NotFound(String),

    /// Action requires a prior product selection
    #[error("No product selected")]
    NoSelection,

    /// Stock sequence for the product is empty
    #[error("Out of stock: {category}/{product}")]
    OutOfStock { category: String, product: String },

    /// Chat transport failed to deliver a call
    #[error("Transport error: {0}")]
    Transport(String),

    /// Catalog persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl ShopError {
    /// Check if error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io(_))
    }

    /// Whether the error belongs to the conversational taxonomy and is
    /// answered with a user-facing message rather than propagated
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::NoSelection | Self::OutOfStock { .. }
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(what) => format!("❌ {what} not found."),
            Self::NoSelection => "Please choose a product first. Send /start to browse the catalog.".into(),
            Self::OutOfStock { product, .. } => {
                format!("😔 Sorry, {product} is out of stock right now. Please contact support.")
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for ShopError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
