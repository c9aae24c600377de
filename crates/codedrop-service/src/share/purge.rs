//! Removal of expired share records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use codedrop_core::result::AppResult;
use codedrop_database::repositories::ShareRecordStore;

/// Deletes records whose expiry has passed.
#[derive(Debug, Clone)]
pub struct PurgeService {
    store: Arc<dyn ShareRecordStore>,
}

impl PurgeService {
    /// Creates a new purge service.
    pub fn new(store: Arc<dyn ShareRecordStore>) -> Self {
        Self { store }
    }

    /// Deletes every record expired at `now` and returns how many went.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let removed = self.store.delete_expired(now).await?;
        info!(removed, backend = self.store.backend(), "Purged expired share records");
        Ok(removed)
    }

    /// Deletes every record expired as of the current time.
    pub async fn purge_now(&self) -> AppResult<u64> {
        self.purge_expired(Utc::now()).await
    }
}
