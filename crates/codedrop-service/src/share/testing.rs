//! Collaborator doubles shared by the service tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

use codedrop_core::error::AppError;
use codedrop_core::result::AppResult;
use codedrop_core::traits::storage::{StorageProvider, StoredObject, UploadSession};
use codedrop_core::types::ShareCode;
use codedrop_database::repositories::ShareRecordStore;
use codedrop_entity::share::{NewShareRecord, ShareRecord};

/// In-memory storage that records how many objects it accepted.
#[derive(Debug, Default)]
pub struct FakeStorage {
    stored: AtomicUsize,
    fail: bool,
    no_sessions: bool,
}

impl FakeStorage {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn without_sessions() -> Self {
        Self {
            no_sessions: true,
            ..Self::default()
        }
    }

    pub fn stored_count(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageProvider for FakeStorage {
    fn provider_type(&self) -> &str {
        "fake"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.fail)
    }

    async fn store(&self, name: &str, _media_type: &str, data: Bytes) -> AppResult<StoredObject> {
        if self.fail {
            return Err(AppError::storage("bucket unavailable"));
        }
        let n = self.stored.fetch_add(1, Ordering::SeqCst);
        let key = format!("{n}/{name}");
        Ok(StoredObject {
            url: format!("https://storage.test/{key}"),
            size_bytes: data.len() as u64,
            key,
        })
    }

    async fn create_upload_session(
        &self,
        name: &str,
        _media_type: &str,
    ) -> AppResult<UploadSession> {
        if self.no_sessions {
            return Err(AppError::not_implemented("no direct uploads"));
        }
        let key = format!("session/{name}");
        Ok(UploadSession {
            upload_url: format!("https://storage.test/{key}?signature=abc"),
            url: format!("https://storage.test/{key}"),
            expires_at: Utc::now() + Duration::minutes(15),
            key,
        })
    }
}

/// A record store whose backend is always down.
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl ShareRecordStore for FailingStore {
    fn backend(&self) -> &str {
        "failing"
    }

    async fn insert(&self, _record: NewShareRecord) -> AppResult<ShareRecord> {
        Err(AppError::dependency("connection refused"))
    }

    async fn find_by_code(&self, _code: ShareCode) -> AppResult<Option<ShareRecord>> {
        Err(AppError::dependency("connection refused"))
    }

    async fn take_by_code(
        &self,
        _code: ShareCode,
        _now: DateTime<Utc>,
    ) -> AppResult<Option<ShareRecord>> {
        Err(AppError::dependency("connection refused"))
    }

    async fn delete_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
        Err(AppError::dependency("connection refused"))
    }

    async fn count(&self) -> AppResult<u64> {
        Err(AppError::dependency("connection refused"))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}
