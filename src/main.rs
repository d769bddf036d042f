use std::sync::Arc;

use anyhow::Context;
use dashboard_auth::app::{cors_layer, router, AppState};
use dashboard_auth::config::AppConfig;
use dashboard_auth::database::{InMemoryUserStore, PgUserStore, UserStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ACCESS_TOKEN_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Dashboard Auth in {:?} mode", config.environment);

    let users: Arc<dyn UserStore> = match &config.database.url {
        Some(url) => Arc::new(PgUserStore::connect_lazy(url, &config.database).context("invalid DATABASE_URL")?),
        None => {
            tracing::warn!("DATABASE_URL not set; using an empty in-memory user store");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let state = AppState::from_config(&config, users);
    let mut app = router(state);
    if let Some(cors) = cors_layer(&config.security) {
        app = app.layer(cors);
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Dashboard Auth listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
