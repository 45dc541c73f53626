use crate::models::{Hit, HitField, NewHit, StringCount};
use anyhow::Result;
use async_trait::async_trait;

/// Append-only storage of pageview hits.
///
/// Implementations must be safe to share between concurrent requests; every
/// method is a single round trip to the backing database.
#[async_trait]
pub trait HitStore: Send + Sync {
    /// Initialize the storage (create tables and indexes). Idempotent.
    async fn init(&self) -> Result<()>;

    /// Append one hit and return it with its store-assigned id and timestamp.
    async fn insert(&self, hit: &NewHit) -> Result<Hit>;

    /// Number of distinct user ids among the hits recorded for `client_id`.
    async fn count_distinct_users(&self, client_id: &str) -> Result<i64>;

    /// Every distinct value of `field` among the hits for `client_id`, with
    /// its number of occurrences. Unordered and untruncated.
    async fn group_by_count(&self, client_id: &str, field: HitField) -> Result<Vec<StringCount>>;
}
