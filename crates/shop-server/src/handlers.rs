//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use shop_catalog::StockLevel;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub transport: String,
    pub catalog_readable: bool,
    pub active_chats: usize,
}

#[derive(Debug, Serialize)]
pub struct StockResponse {
    pub products: Vec<StockLevel>,
    pub total_remaining: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog_readable = state.catalog.load().is_ok();
    let active_chats = state.sessions.len().unwrap_or(0);

    Json(HealthResponse {
        status: if catalog_readable { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        transport: state.transport.name().to_string(),
        catalog_readable,
        active_chats,
    })
}

/// Remaining stock per product (counts only)
pub async fn stock_summary(
    State(state): State<AppState>,
) -> Result<Json<StockResponse>, (StatusCode, Json<ErrorResponse>)> {
    let catalog = state.catalog.load().map_err(|e| {
        tracing::error!("Catalog read error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Catalog unavailable".into(),
                code: "CATALOG_ERROR".into(),
            }),
        )
    })?;

    let products = catalog.stock_levels();
    let total_remaining = products.iter().map(|p| p.remaining).sum();

    Ok(Json(StockResponse {
        products,
        total_remaining,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use shop_catalog::{Catalog, JsonCatalogStore, MemoryCatalogStore};
    use shop_core::{MemorySessionStore, RecordingTransport};

    fn state_with(catalog: Arc<dyn shop_catalog::CatalogStore>) -> AppState {
        AppState {
            catalog,
            sessions: Arc::new(MemorySessionStore::new()),
            transport: Arc::new(RecordingTransport::new()),
        }
    }

    #[tokio::test]
    async fn test_stock_summary_counts() {
        let catalog = Catalog::from_json(
            r#"{"Games":{"Chess":{"price":10,"stock":["KEY1","KEY2"]},"Go":{"price":8}}}"#,
        )
        .unwrap();
        let state = state_with(Arc::new(MemoryCatalogStore::new(catalog)));

        let Json(summary) = stock_summary(State(state)).await.unwrap();
        assert_eq!(summary.total_remaining, 2);
        assert_eq!(summary.products.len(), 2);

        let body = serde_json::to_string(&summary.products).unwrap();
        assert!(!body.contains("KEY1"));
    }

    #[tokio::test]
    async fn test_health_degraded_without_catalog() {
        let state = state_with(Arc::new(JsonCatalogStore::new("/nonexistent/catalog.json")));

        let Json(health) = health_check(State(state.clone())).await;
        assert_eq!(health.status, "degraded");
        assert_eq!(health.transport, "recording");

        let err = stock_summary(State(state)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
