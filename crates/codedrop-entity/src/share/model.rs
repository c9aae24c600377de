//! Share record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use codedrop_core::types::ShareCode;

/// How the retrieval URL of a record was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_origin", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareOrigin {
    /// Bytes were posted to the service and forwarded to storage.
    Upload,
    /// The client uploaded directly to storage through a pre-signed URL.
    UploadSession,
    /// The client supplied a URL it had already uploaded to.
    Link,
}

/// A persisted code-to-URL mapping.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// The short numeric lookup key.
    pub code: ShareCode,
    /// Opaque retrieval location, returned verbatim on redemption.
    pub url: String,
    /// How the URL was obtained.
    pub origin: ShareOrigin,
    /// Original file name, when known.
    pub file_name: Option<String>,
    /// Media type of the file, when known.
    pub media_type: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record stops being redeemable. `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareRecord {
    /// Check whether the record can still be redeemed at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at > now,
            None => true,
        }
    }
}

/// Data required to insert a share record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShareRecord {
    /// Candidate code. The store rejects it if already taken.
    pub code: ShareCode,
    /// Retrieval URL (must be non-empty).
    pub url: String,
    /// How the URL was obtained.
    pub origin: ShareOrigin,
    /// Original file name.
    pub file_name: Option<String>,
    /// Media type.
    pub media_type: Option<String>,
    /// Expiry instant.
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewShareRecord {
    /// Materialize the row the store will hold, stamped with `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> ShareRecord {
        ShareRecord {
            id: Uuid::new_v4(),
            code: self.code,
            url: self.url,
            origin: self.origin,
            file_name: self.file_name,
            media_type: self.media_type,
            created_at: now,
            expires_at: self.expires_at,
        }
    }
}
