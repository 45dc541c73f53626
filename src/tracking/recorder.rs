//! Write path: turn a beacon into a stored hit
//!
//! Failures here are logged and dropped. The beacon must answer with its
//! image no matter what happened to the insert.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::models::{NewHit, DIRECT_REFERER};
use crate::storage::HitStore;

/// What happened to a recorded hit. Informational only; callers on the
/// beacon path ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Stored,
    Dropped,
}

pub struct HitRecorder {
    store: Arc<dyn HitStore>,
    timeout: Duration,
}

impl HitRecorder {
    pub fn new(store: Arc<dyn HitStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Build a hit and append it to the store.
    ///
    /// An empty `referer` is stored as `(direct)`; anything else is kept
    /// unchanged.
    pub async fn record(
        &self,
        client_id: &str,
        user_id: &str,
        page: &str,
        referer: &str,
    ) -> RecordOutcome {
        let hit = NewHit {
            client_id: client_id.to_string(),
            user_id: user_id.to_string(),
            page: page.to_string(),
            referer: normalize_referer(referer).to_string(),
        };

        match tokio::time::timeout(self.timeout, self.store.insert(&hit)).await {
            Ok(Ok(stored)) => {
                debug!(client_id = %stored.client_id, hit_id = stored.id, "hit recorded");
                RecordOutcome::Stored
            }
            Ok(Err(err)) => {
                warn!(component = "hit_recorder", client_id = %client_id, error = %err, "failed to record hit");
                RecordOutcome::Dropped
            }
            Err(_) => {
                warn!(
                    component = "hit_recorder",
                    client_id = %client_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "timed out recording hit"
                );
                RecordOutcome::Dropped
            }
        }
    }
}

pub fn normalize_referer(referer: &str) -> &str {
    if referer.is_empty() {
        DIRECT_REFERER
    } else {
        referer
    }
}
