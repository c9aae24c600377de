//! Share record store contract and its implementations.
//!
//! Two backends implement [`ShareRecordStore`]:
//!
//! - [`ShareRecordRepository`]: PostgreSQL, uniqueness enforced by the
//!   `share_records_code_key` constraint.
//! - [`MemoryShareRecordStore`]: a concurrent map for a single process,
//!   uniqueness enforced by the map's entry API.

pub mod memory;
pub mod share_record;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use codedrop_core::result::AppResult;
use codedrop_core::types::ShareCode;
use codedrop_entity::share::{NewShareRecord, ShareRecord};

pub use memory::MemoryShareRecordStore;
pub use share_record::ShareRecordRepository;

/// Durable mapping from share codes to records.
///
/// Every method is a single atomic operation against the backend. Callers
/// never read before writing to check for a free code; [`insert`] reports
/// a taken code with an error of kind `Conflict` instead.
///
/// [`insert`]: ShareRecordStore::insert
#[async_trait]
pub trait ShareRecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name (`"postgres"` or `"memory"`).
    fn backend(&self) -> &str;

    /// Insert a record. Fails with `Conflict` if the code is already taken.
    async fn insert(&self, record: NewShareRecord) -> AppResult<ShareRecord>;

    /// Look up a record by code, regardless of expiry.
    async fn find_by_code(&self, code: ShareCode) -> AppResult<Option<ShareRecord>>;

    /// Atomically remove and return the record for `code` if it is live
    /// at `now`. Two concurrent calls for the same code cannot both
    /// return it.
    async fn take_by_code(
        &self,
        code: ShareCode,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ShareRecord>>;

    /// Delete every record that expired at or before `now`. Returns the
    /// number removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Number of stored records.
    async fn count(&self) -> AppResult<u64>;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
