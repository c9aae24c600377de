//! PostgreSQL share record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use codedrop_core::error::{AppError, ErrorKind};
use codedrop_core::result::AppResult;
use codedrop_core::types::ShareCode;
use codedrop_entity::share::{NewShareRecord, ShareRecord};

use super::ShareRecordStore;

/// Repository for share records stored in the `share_records` table.
#[derive(Debug, Clone)]
pub struct ShareRecordRepository {
    pool: PgPool,
}

impl ShareRecordRepository {
    /// Create a new share record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareRecordStore for ShareRecordRepository {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn insert(&self, record: NewShareRecord) -> AppResult<ShareRecord> {
        sqlx::query_as::<_, ShareRecord>(
            "INSERT INTO share_records (id, code, url, origin, file_name, media_type, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(record.code)
        .bind(&record.url)
        .bind(record.origin)
        .bind(&record.file_name)
        .bind(&record.media_type)
        .bind(record.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let (unique, check) = match &e {
                sqlx::Error::Database(db) => (db.is_unique_violation(), db.is_check_violation()),
                _ => (false, false),
            };
            if unique {
                AppError::conflict(format!("Share code {} is already taken", record.code))
            } else if check {
                AppError::with_source(ErrorKind::Validation, "Share URL must not be empty", e)
            } else {
                AppError::with_source(ErrorKind::Dependency, "Failed to insert share record", e)
            }
        })
    }

    async fn find_by_code(&self, code: ShareCode) -> AppResult<Option<ShareRecord>> {
        sqlx::query_as::<_, ShareRecord>("SELECT * FROM share_records WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Dependency, "Failed to find share record", e)
            })
    }

    async fn take_by_code(
        &self,
        code: ShareCode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareRecord>> {
        sqlx::query_as::<_, ShareRecord>(
            "DELETE FROM share_records \
             WHERE code = $1 AND (expires_at IS NULL OR expires_at > $2) \
             RETURNING *",
        )
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Dependency, "Failed to take share record", e))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM share_records WHERE expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Dependency, "Failed to purge expired records", e)
        })?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM share_records")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Dependency, "Failed to count share records", e)
            })?;
        Ok(count.max(0) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Dependency, "Health check failed", e))
    }
}
