//! Expired share record purge job.

use std::time::Instant;

use chrono::Utc;
use serde_json::Value;

use codedrop_core::result::AppResult;
use codedrop_service::PurgeService;

/// Deletes share records whose expiry has passed.
#[derive(Debug, Clone)]
pub struct PurgeJobHandler {
    service: PurgeService,
}

impl PurgeJobHandler {
    /// Create a new purge job handler
    pub fn new(service: PurgeService) -> Self {
        Self { service }
    }

    /// Run one purge pass and return a summary
    pub async fn run(&self) -> AppResult<Value> {
        let started = Instant::now();
        let now = Utc::now();
        let removed = self.service.purge_expired(now).await?;

        Ok(serde_json::json!({
            "task": "share_purge",
            "cutoff": now.to_rfc3339(),
            "expired_records_removed": removed,
            "duration_ms": started.elapsed().as_millis() as u64,
        }))
    }
}
