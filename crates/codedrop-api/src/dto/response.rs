//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use codedrop_core::types::ShareCode;
use codedrop_entity::share::ShareRecord;
use codedrop_service::UploadTicket;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// An issued share code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueResponse {
    /// The code to hand to the recipient.
    pub code: ShareCode,
    /// Where the file can be retrieved.
    pub url: String,
    /// When the code stops working (absent = never).
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShareRecord> for IssueResponse {
    fn from(record: ShareRecord) -> Self {
        Self {
            code: record.code,
            url: record.url,
            expires_at: record.expires_at,
        }
    }
}

/// An issued code plus the pre-signed URL to upload the file to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadSessionResponse {
    /// The code to hand to the recipient.
    pub code: ShareCode,
    /// Where the file will be retrievable once uploaded.
    pub url: String,
    /// When the code stops working.
    pub expires_at: Option<DateTime<Utc>>,
    /// URL to `PUT` the file to.
    pub upload_url: String,
    /// When `upload_url` stops being accepted.
    pub upload_expires_at: DateTime<Utc>,
}

impl From<UploadTicket> for UploadSessionResponse {
    fn from(ticket: UploadTicket) -> Self {
        Self {
            code: ticket.record.code,
            url: ticket.record.url,
            expires_at: ticket.record.expires_at,
            upload_url: ticket.upload_url,
            upload_expires_at: ticket.upload_expires_at,
        }
    }
}

/// A redeemed code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemResponse {
    /// The stored retrieval URL, verbatim.
    pub url: String,
    /// Original file name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Media type, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl From<ShareRecord> for RedeemResponse {
    fn from(record: ShareRecord) -> Self {
        Self {
            url: record.url,
            file_name: record.file_name,
            media_type: record.media_type,
        }
    }
}

/// Basic liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Seconds since the server state was built.
    pub uptime_seconds: u64,
}

/// Reachability of one collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Backend or provider name.
    pub backend: String,
    /// `"ok"` or `"unavailable"`.
    pub status: String,
}

/// Readiness response covering the record store and object storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `"ok"` when every component is reachable, `"degraded"` otherwise.
    pub status: String,
    /// Record store reachability.
    pub record_store: ComponentHealth,
    /// Object storage reachability.
    pub storage: ComponentHealth,
    /// Upload strategy offered to clients.
    pub upload_strategy: String,
}
