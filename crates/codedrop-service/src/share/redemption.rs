//! Share redemption: exchange a code for its URL.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use codedrop_core::config::share::ShareConfig;
use codedrop_core::error::AppError;
use codedrop_core::result::AppResult;
use codedrop_core::types::{CodeFormat, ShareCode};
use codedrop_database::repositories::ShareRecordStore;
use codedrop_entity::share::ShareRecord;

/// Message returned for every miss, so callers cannot tell an unknown
/// code from an expired or consumed one.
const NOT_FOUND_MESSAGE: &str = "Invalid or expired code";

/// Resolves share codes.
#[derive(Debug, Clone)]
pub struct RedemptionService {
    /// Record store.
    store: Arc<dyn ShareRecordStore>,
    /// Accepted code shape.
    format: CodeFormat,
    /// Consume records on redemption.
    single_use: bool,
}

impl RedemptionService {
    /// Creates a new redemption service.
    pub fn new(store: Arc<dyn ShareRecordStore>, config: &ShareConfig) -> AppResult<Self> {
        Ok(Self {
            store,
            format: CodeFormat::new(config.code_width)?,
            single_use: config.single_use,
        })
    }

    /// Whether records are deleted once redeemed.
    pub fn is_single_use(&self) -> bool {
        self.single_use
    }

    /// Parses user input and redeems it.
    ///
    /// Malformed input is rejected with `Validation` before the record
    /// store is consulted.
    pub async fn redeem(&self, input: &str) -> AppResult<ShareRecord> {
        let code = self.format.parse(input)?;
        self.redeem_code(code).await
    }

    /// Redeems an already-parsed code.
    pub async fn redeem_code(&self, code: ShareCode) -> AppResult<ShareRecord> {
        if !self.format.contains(code) {
            return Err(AppError::validation(format!(
                "Code must be exactly {} digits",
                self.format.width()
            )));
        }

        let now = Utc::now();
        let found = if self.single_use {
            self.store.take_by_code(code, now).await?
        } else {
            self.store
                .find_by_code(code)
                .await?
                .filter(|record| record.is_live(now))
        };

        match found {
            Some(record) => {
                info!(code = %code, consumed = self.single_use, "Share redeemed");
                Ok(record)
            }
            None => {
                debug!(code = %code, "Share code not found");
                Err(AppError::not_found(NOT_FOUND_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use codedrop_core::error::ErrorKind;
    use codedrop_database::repositories::MemoryShareRecordStore;
    use codedrop_entity::share::{NewShareRecord, ShareOrigin};

    use super::*;
    use crate::share::testing::FailingStore;

    fn config(single_use: bool) -> ShareConfig {
        ShareConfig {
            single_use,
            ..ShareConfig::default()
        }
    }

    async fn seed(
        store: &MemoryShareRecordStore,
        code: i32,
        expires_at: Option<chrono::DateTime<Utc>>,
    ) {
        store
            .insert(NewShareRecord {
                code: ShareCode(code),
                url: "https://example.com/f.pdf".to_string(),
                origin: ShareOrigin::Link,
                file_name: None,
                media_type: None,
                expires_at,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_redeem_returns_stored_url() {
        let store = Arc::new(MemoryShareRecordStore::new());
        seed(&store, 48213, None).await;
        let service = RedemptionService::new(store, &config(false)).unwrap();

        let record = service.redeem("48213").await.unwrap();
        assert_eq!(record.url, "https://example.com/f.pdf");

        // Multi-use: still there.
        assert!(service.redeem(" 48213 ").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let service =
            RedemptionService::new(Arc::new(MemoryShareRecordStore::new()), &config(false)).unwrap();
        let err = service.redeem("99999").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_code_never_reaches_store() {
        // The failing store would turn any lookup into a Dependency error.
        let service = RedemptionService::new(Arc::new(FailingStore), &config(false)).unwrap();
        for input in ["", "abc", "1234", "123456", "12a45"] {
            let err = service.redeem(input).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "input {input:?}");
        }

        let err = service.redeem_code(ShareCode(12)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_as_dependency() {
        let service = RedemptionService::new(Arc::new(FailingStore), &config(false)).unwrap();
        let err = service.redeem("48213").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Dependency);
    }

    #[tokio::test]
    async fn test_expired_record_is_not_found() {
        let store = Arc::new(MemoryShareRecordStore::new());
        seed(&store, 48213, Some(Utc::now() - Duration::seconds(1))).await;
        let service = RedemptionService::new(store, &config(false)).unwrap();

        let err = service.redeem("48213").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_single_use_redeems_once() {
        let store = Arc::new(MemoryShareRecordStore::new());
        seed(&store, 48213, None).await;
        let service = RedemptionService::new(store.clone(), &config(true)).unwrap();

        assert!(service.redeem("48213").await.is_ok());
        let err = service.redeem("48213").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_use_concurrent_redemptions_admit_one() {
        let store = Arc::new(MemoryShareRecordStore::new());
        seed(&store, 48213, None).await;
        let service = RedemptionService::new(store, &config(true)).unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.redeem("48213").await }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }
}
