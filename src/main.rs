use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beacon::api::{self, AppState};
use beacon::config::Config;
use beacon::storage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Initializing database...");
    let store = storage::connect(&config.database).await?;
    info!("Database initialized successfully");

    if let Some(ref static_dir) = config.frontend.static_dir {
        info!("🎨 Serving dashboard assets from directory: {}", static_dir);
    } else {
        info!("🎨 Serving embedded dashboard assets");
    }

    let state = Arc::new(AppState::new(
        store,
        config.store_timeout(),
        config.frontend.clone(),
    ));
    let router = api::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Beacon server listening on http://{}", addr);
    info!("   - Tracking pixel at http://{}/client/<client_id>/tracker.gif", addr);
    info!("   - Dashboard at http://{}/client/<client_id>/dash", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
