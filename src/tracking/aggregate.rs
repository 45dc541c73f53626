//! Read path: dashboard aggregations computed on demand from stored hits

use std::cmp::Ordering;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::{HitField, StringCount};
use crate::storage::HitStore;

/// Number of entries kept by the top-referer and top-page rankings.
pub const TOP_N: usize = 10;

/// Read failures are surfaced, unlike write failures.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("hit store query failed: {0}")]
    Store(#[from] anyhow::Error),
    #[error("hit store query timed out after {0:?}")]
    Timeout(Duration),
}

pub type AggregateResult<T> = Result<T, AggregateError>;

pub struct Aggregator {
    store: Arc<dyn HitStore>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(store: Arc<dyn HitStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Distinct visitors seen for `client_id`.
    pub async fn uniques(&self, client_id: &str) -> AggregateResult<i64> {
        self.bounded(self.store.count_distinct_users(client_id)).await
    }

    /// Up to [`TOP_N`] referers, most frequent first.
    pub async fn top_referers(&self, client_id: &str) -> AggregateResult<Vec<StringCount>> {
        self.top(client_id, HitField::Referer).await
    }

    /// Up to [`TOP_N`] pages, most frequent first.
    pub async fn top_pages(&self, client_id: &str) -> AggregateResult<Vec<StringCount>> {
        self.top(client_id, HitField::Page).await
    }

    async fn top(&self, client_id: &str, field: HitField) -> AggregateResult<Vec<StringCount>> {
        let counts = self
            .bounded(self.store.group_by_count(client_id, field))
            .await?;
        Ok(rank(counts, TOP_N))
    }

    async fn bounded<T>(
        &self,
        query: impl Future<Output = anyhow::Result<T>>,
    ) -> AggregateResult<T> {
        match tokio::time::timeout(self.timeout, query).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(AggregateError::Timeout(self.timeout)),
        }
    }
}

/// Sort by count descending, ties by value ascending, then keep `limit`.
pub fn rank(mut counts: Vec<StringCount>, limit: usize) -> Vec<StringCount> {
    counts.sort_unstable_by(compare_ranked);
    counts.truncate(limit);
    counts
}

fn compare_ranked(a: &StringCount, b: &StringCount) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value))
}
