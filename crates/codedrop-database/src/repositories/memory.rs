//! In-memory share record store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use codedrop_core::error::AppError;
use codedrop_core::result::AppResult;
use codedrop_core::types::ShareCode;
use codedrop_entity::share::{NewShareRecord, ShareRecord};

use super::ShareRecordStore;

/// Share records held in a concurrent map.
///
/// Insert-if-absent goes through the map's entry API, which locks the
/// shard for the code, so two concurrent inserts of the same code cannot
/// both succeed. Records do not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareRecordStore {
    records: Arc<DashMap<ShareCode, ShareRecord>>,
}

impl MemoryShareRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShareRecordStore for MemoryShareRecordStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn insert(&self, record: NewShareRecord) -> AppResult<ShareRecord> {
        if record.url.is_empty() {
            return Err(AppError::validation("Share URL must not be empty"));
        }

        match self.records.entry(record.code) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "Share code {} is already taken",
                record.code
            ))),
            Entry::Vacant(slot) => {
                let stored = record.into_record(Utc::now());
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn find_by_code(&self, code: ShareCode) -> AppResult<Option<ShareRecord>> {
        Ok(self.records.get(&code).map(|r| r.value().clone()))
    }

    async fn take_by_code(
        &self,
        code: ShareCode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareRecord>> {
        Ok(self
            .records
            .remove_if(&code, |_, record| record.is_live(now))
            .map(|(_, record)| record))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        self.records.retain(|_, record| {
            let live = record.is_live(now);
            if !live {
                removed += 1;
            }
            live
        });
        Ok(removed)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.records.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use codedrop_core::error::ErrorKind;
    use codedrop_entity::share::ShareOrigin;

    fn new_record(code: i32, expires_at: Option<DateTime<Utc>>) -> NewShareRecord {
        NewShareRecord {
            code: ShareCode(code),
            url: format!("https://example.com/{code}.pdf"),
            origin: ShareOrigin::Link,
            file_name: Some("f.pdf".to_string()),
            media_type: Some("application/pdf".to_string()),
            expires_at,
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryShareRecordStore::new();
        let inserted = store.insert(new_record(48213, None)).await.unwrap();
        assert_eq!(inserted.code, ShareCode(48213));

        let found = store.find_by_code(ShareCode(48213)).await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.url, "https://example.com/48213.pdf");
        assert!(store.find_by_code(ShareCode(11111)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let store = MemoryShareRecordStore::new();
        store.insert(new_record(48213, None)).await.unwrap();
        let err = store.insert(new_record(48213, None)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let store = MemoryShareRecordStore::new();
        let mut record = new_record(48213, None);
        record.url.clear();
        let err = store.insert(record).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_of_same_code_admit_one() {
        let store = MemoryShareRecordStore::new();
        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(new_record(77777, None)).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 1);
    }

    #[tokio::test]
    async fn test_take_is_single_shot() {
        let store = MemoryShareRecordStore::new();
        let now = Utc::now();
        store.insert(new_record(48213, None)).await.unwrap();

        assert!(store.take_by_code(ShareCode(48213), now).await.unwrap().is_some());
        assert!(store.take_by_code(ShareCode(48213), now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_take_leaves_expired_record_for_purge() {
        let store = MemoryShareRecordStore::new();
        let now = Utc::now();
        store
            .insert(new_record(48213, Some(now - Duration::seconds(1))))
            .await
            .unwrap();

        assert!(store.take_by_code(ShareCode(48213), now).await.unwrap().is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_expired_only_removes_expired() {
        let store = MemoryShareRecordStore::new();
        let now = Utc::now();
        store.insert(new_record(10001, None)).await.unwrap();
        store
            .insert(new_record(10002, Some(now + Duration::hours(1))))
            .await
            .unwrap();
        store
            .insert(new_record(10003, Some(now - Duration::hours(1))))
            .await
            .unwrap();
        store.insert(new_record(10004, Some(now))).await.unwrap();

        assert_eq!(store.delete_expired(now).await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(store.find_by_code(ShareCode(10001)).await.unwrap().is_some());
        assert!(store.find_by_code(ShareCode(10002)).await.unwrap().is_some());
    }
}
