use crate::models::{Hit, HitField, NewHit, StringCount};
use crate::storage::HitStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SqliteStore {
    pool: Arc<SqlitePool>,
}

impl SqliteStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl HitStore for SqliteStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                page TEXT NOT NULL,
                referer TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_hits_client_user ON hits(client_id, user_id)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_hits_client_referer ON hits(client_id, referer)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_hits_client_page ON hits(client_id, page)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn insert(&self, hit: &NewHit) -> Result<Hit> {
        let created_at = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, Hit>(
            r#"
            INSERT INTO hits (client_id, user_id, page, referer, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, client_id, user_id, page, referer, created_at
            "#,
        )
        .bind(&hit.client_id)
        .bind(&hit.user_id)
        .bind(&hit.page)
        .bind(&hit.referer)
        .bind(created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn count_distinct_users(&self, client_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT user_id) FROM hits
            WHERE client_id = ?
            "#,
        )
        .bind(client_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn group_by_count(&self, client_id: &str, field: HitField) -> Result<Vec<StringCount>> {
        let column = field.column();
        let query = format!(
            r#"
            SELECT {column} AS value, COUNT(*) AS count
            FROM hits
            WHERE client_id = ?
            GROUP BY {column}
            "#
        );

        let counts = sqlx::query_as::<_, StringCount>(&query)
            .bind(client_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(counts)
    }
}
