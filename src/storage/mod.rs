pub mod postgres;
pub mod sqlite;
pub mod trait_def;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use trait_def::HitStore;

use crate::config::{DatabaseBackend, DatabaseConfig};
use anyhow::Result;
use std::sync::Arc;

/// Connect to the configured backend and make sure the schema exists.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn HitStore>> {
    let store: Arc<dyn HitStore> = match config.backend {
        DatabaseBackend::Sqlite => {
            tracing::info!("Using SQLite storage: {}", config.url);
            Arc::new(SqliteStore::new(&config.url, config.max_connections).await?)
        }
        DatabaseBackend::Postgres => {
            tracing::info!("Using PostgreSQL storage: {}", config.url);
            Arc::new(PostgresStore::new(&config.url, config.max_connections).await?)
        }
    };

    store.init().await?;
    Ok(store)
}
