use anyhow::Context;
use tracing_subscriber::EnvFilter;

use freelance_portal::config::{config, StoreBackend};
use freelance_portal::database::{DatabaseError, DatabaseManager, PgStore, Store};
use freelance_portal::domain::Fixtures;
use freelance_portal::handlers::AppState;
use freelance_portal::routes::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, DATABASE_BACKEND, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config();
    tracing::info!("Starting Freelance Portal API in {:?} mode", config.environment);

    match config.database.backend {
        StoreBackend::Memory => {
            let path = config
                .database
                .fixtures_path
                .as_deref()
                .ok_or(DatabaseError::ConfigMissing("DATABASE_FIXTURES"))?;
            let store = Fixtures::load(path)?.into_store()?;
            serve(store, config.api.port).await
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            serve(PgStore::new(pool), config.api.port).await
        }
    }
}

async fn serve<S: Store>(store: S, port: u16) -> anyhow::Result<()> {
    tracing::info!("Using {} store", store.backend());
    let app = app(AppState::new(store));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Freelance Portal API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
