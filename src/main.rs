use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use draft_orders::config::AppConfig;
use draft_orders::domain::order::OrderService;
use draft_orders::store::{InMemoryOrderStore, OrderStore, PgOrderStore};
use draft_orders::{http, metrics};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,draft_orders=debug")),
        )
        .init();

    tracing::info!("Starting draft orders service");

    let config = AppConfig::load()?;

    // === 1. Store ===
    let store: Arc<dyn OrderStore> = match config.database_url.as_deref() {
        Some(url) => Arc::new(PgOrderStore::connect(url, config.database_max_connections).await?),
        None => {
            tracing::warn!("DATABASE_URL not set, orders are kept in memory only");
            let store = InMemoryOrderStore::new();
            for product_id in config.seed_product_ids() {
                store.insert_product(product_id).await;
            }
            Arc::new(store)
        }
    };

    // === 2. Order service ===
    let service_config = config.order_service_config();
    if service_config.default_buyer_organization_id.is_none() {
        tracing::info!("SEED_BUYER_ORG_ID not set, new orders default to the placeholder buyer");
    }
    let service = Arc::new(OrderService::new(store, service_config));

    // === 3. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 4. HTTP ===
    http::start_server(
        http::AppState { service, metrics },
        &config.http_host,
        config.http_port,
    )
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
