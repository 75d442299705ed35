use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use till::config::ServiceConfig;
use till::core::identity::TokenIdentityProvider;
use till::payments::{HandlerRegistry, PaymentOrchestrator};
use till::server::{AppState, build_router};
use till::storage::{InMemoryStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServiceConfig::from_env();

    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let identity = Arc::new(TokenIdentityProvider::new(
        store.clone(),
        &config.token_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    ));
    let orchestrator = Arc::new(PaymentOrchestrator::new(
        store.clone(),
        HandlerRegistry::with_simulated_handlers(),
        config.handler_timeout,
    ));

    let app = build_router(AppState {
        store,
        identity,
        orchestrator,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "till listening");
    axum::serve(listener, app).await?;

    Ok(())
}
