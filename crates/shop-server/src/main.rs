//! keyshop server
//!
//! Runs the storefront bot: Telegram long polling feeds events to the
//! conversation controller one at a time. A small Axum server exposes
//! health and stock endpoints alongside.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{Router, routing::get};
use futures::{Stream, StreamExt};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shop_catalog::{CatalogStore, DirectoryDescriptions, JsonCatalogStore};
use shop_core::{InboundEvent, MemorySessionStore};
use shop_runtime::TelegramTransport;
use storefront::{Controller, ShopConfig};

use crate::handlers::{health_check, stock_summary};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ShopConfig::from_env()?;

    // Catalog
    let catalog: Arc<dyn CatalogStore> = if config.cache_catalog {
        Arc::new(JsonCatalogStore::cached(&config.catalog_path))
    } else {
        Arc::new(JsonCatalogStore::new(&config.catalog_path))
    };

    match catalog.load() {
        Ok(loaded) => {
            let levels = loaded.stock_levels();
            tracing::info!(
                path = %config.catalog_path.display(),
                products = levels.len(),
                keys = levels.iter().map(|l| l.remaining).sum::<usize>(),
                "✓ Catalog loaded"
            );
        }
        Err(e) => {
            tracing::warn!("⚠ Catalog not readable: {}", e);
            tracing::warn!("  Interactions will fail until {} exists", config.catalog_path.display());
        }
    }

    let descriptions = Arc::new(DirectoryDescriptions::new(&config.descriptions_dir));
    let sessions = Arc::new(MemorySessionStore::new());

    // Chat transport
    let transport = Arc::new(TelegramTransport::from_env()?);
    match transport.get_me().await {
        Ok(me) => tracing::info!(
            "✓ Telegram bot: @{} ({})",
            me.username.as_deref().unwrap_or("unknown"),
            me.first_name
        ),
        Err(e) => tracing::warn!("⚠ Telegram getMe failed: {}", e),
    }

    tracing::info!(admin = %config.admin, "Approvals restricted to admin chat");

    let state = AppState {
        catalog: catalog.clone(),
        sessions: sessions.clone(),
        transport: transport.clone(),
    };

    let controller = Controller::new(catalog, sessions, descriptions, transport.clone(), config);

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/stock", get(stock_summary))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🛒 keyshop running, status on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("  GET  /health     - Health check");
    tracing::info!("  GET  /api/stock  - Remaining stock per product");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("HTTP server stopped: {}", e);
        }
    });

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_events(&controller, transport.start_polling(), shutdown).await;

    Ok(())
}

/// Handle events strictly one after another until the stream ends or
/// `shutdown` resolves
async fn run_events<S, F>(controller: &Controller, mut events: S, shutdown: F)
where
    S: Stream<Item = InboundEvent> + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else {
                    tracing::warn!("Event stream closed");
                    break;
                };
                if let Err(e) = controller.handle(event).await {
                    tracing::error!(error = %e, retryable = e.is_retryable(), "Event handling failed");
                }
            }
            () = &mut shutdown => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::stream;
    use shop_catalog::{Catalog, MemoryCatalogStore, StaticDescriptions};
    use shop_core::{ChatId, OutboundCall, RecordingTransport};

    const ADMIN: ChatId = ChatId(1);
    const BUYER: ChatId = ChatId(2);

    fn controller(transport: Arc<RecordingTransport>) -> Controller {
        let catalog = Catalog::from_json(r#"{"Games":{"Chess":{"price":10,"stock":["KEY1"]}}}"#).unwrap();
        Controller::new(
            Arc::new(MemoryCatalogStore::new(catalog)),
            Arc::new(MemorySessionStore::new()),
            Arc::new(StaticDescriptions::new()),
            transport,
            ShopConfig::new(ADMIN),
        )
    }

    fn press(data: &str) -> InboundEvent {
        InboundEvent::Callback {
            id: format!("cb-{data}"),
            chat: BUYER,
            from: BUYER,
            data: data.into(),
        }
    }

    #[tokio::test]
    async fn test_events_handled_until_stream_ends() {
        let transport = Arc::new(RecordingTransport::new());
        let controller = controller(transport.clone());
        let events = stream::iter(vec![
            InboundEvent::from_text(BUYER, BUYER, "/start"),
            InboundEvent::from_text(BUYER, BUYER, "/help"),
        ]);

        run_events(&controller, events, std::future::pending()).await;

        assert_eq!(transport.texts_to(BUYER).await.len(), 2);
    }

    #[tokio::test]
    async fn test_shutdown_signalled_once_is_not_lost() {
        let transport = Arc::new(RecordingTransport::new());
        let controller = controller(transport.clone());
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let shutdown = async {
            let _ = rx.await;
        };

        // The signal fires once; an event may be handled before it is
        // observed, after which the stream stays idle.
        tx.send(()).unwrap();
        let events = stream::iter(vec![InboundEvent::from_text(BUYER, BUYER, "/start")])
            .chain(stream::pending());

        tokio::time::timeout(Duration::from_secs(5), run_events(&controller, events, shutdown))
            .await
            .expect("loop should stop once shutdown resolves");
    }

    #[tokio::test]
    async fn test_failed_event_does_not_stop_loop() {
        let transport = Arc::new(RecordingTransport::failing());
        let controller = controller(transport.clone());
        let events = stream::iter(vec![press("home"), press("home")]);

        run_events(&controller, events, std::future::pending()).await;

        let acks = transport
            .calls()
            .await
            .into_iter()
            .filter(|call| matches!(call, OutboundCall::CallbackAnswer { .. }))
            .count();
        assert_eq!(acks, 2);
    }
}
