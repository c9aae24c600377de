//! Share issuance: store content (or accept a URL) and mint a code for it.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use codedrop_core::config::share::ShareConfig;
use codedrop_core::config::storage::UploadStrategy;
use codedrop_core::error::{AppError, ErrorKind};
use codedrop_core::result::AppResult;
use codedrop_core::traits::storage::StorageProvider;
use codedrop_core::types::CodeFormat;
use codedrop_database::repositories::ShareRecordStore;
use codedrop_entity::share::{NewShareRecord, ShareOrigin, ShareRecord};

use super::code::CodeGenerator;

/// What a client hands over to get a code.
#[derive(Debug, Clone)]
pub enum IssueInput {
    /// Raw file bytes to forward to the storage provider.
    Content {
        /// Client-supplied file name.
        name: String,
        /// Media type of the content.
        media_type: String,
        /// File contents.
        data: Bytes,
    },
    /// A URL the client already uploaded to.
    Url {
        /// Retrieval URL.
        url: String,
        /// Optional descriptive file name.
        file_name: Option<String>,
        /// Optional media type.
        media_type: Option<String>,
    },
}

/// A code issued ahead of a direct client upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadTicket {
    /// The persisted record (code and eventual retrieval URL).
    pub record: ShareRecord,
    /// Pre-signed URL the client must `PUT` the bytes to.
    pub upload_url: String,
    /// When `upload_url` stops being accepted.
    pub upload_expires_at: DateTime<Utc>,
}

/// Issues share codes.
#[derive(Debug, Clone)]
pub struct IssuanceService {
    /// Record store.
    store: Arc<dyn ShareRecordStore>,
    /// Object storage for proxied uploads and upload sessions.
    storage: Arc<dyn StorageProvider>,
    /// Candidate code source.
    generator: CodeGenerator,
    /// Insert attempts before giving up on collisions.
    max_attempts: u32,
    /// Record lifetime (`None` = never expires).
    ttl: Option<chrono::Duration>,
    /// Upload strategy offered to clients.
    strategy: UploadStrategy,
}

impl IssuanceService {
    /// Creates a new issuance service.
    pub fn new(
        store: Arc<dyn ShareRecordStore>,
        storage: Arc<dyn StorageProvider>,
        config: &ShareConfig,
        strategy: UploadStrategy,
    ) -> AppResult<Self> {
        if config.max_issue_attempts == 0 {
            return Err(AppError::configuration(
                "share.max_issue_attempts must be at least 1",
            ));
        }
        Ok(Self {
            store,
            storage,
            generator: CodeGenerator::new(CodeFormat::new(config.code_width)?),
            max_attempts: config.max_issue_attempts,
            ttl: config.ttl(),
            strategy,
        })
    }

    /// Format of the codes this service mints.
    pub fn format(&self) -> CodeFormat {
        self.generator.format()
    }

    /// Upload strategy offered to clients.
    pub fn strategy(&self) -> UploadStrategy {
        self.strategy
    }

    /// Issues a code for uploaded content or an existing URL.
    ///
    /// Content is written to storage first; a storage failure is reported
    /// as `Storage` and not retried. The record insert is retried with a
    /// fresh code on every collision, up to the configured attempt budget.
    pub async fn issue(&self, input: IssueInput) -> AppResult<ShareRecord> {
        match input {
            IssueInput::Content {
                name,
                media_type,
                data,
            } => {
                if data.is_empty() {
                    return Err(AppError::validation("File content is required"));
                }
                let size = data.len();

                let stored = self
                    .storage
                    .store(&name, &media_type, data)
                    .await
                    .map_err(|e| {
                        error!(
                            file_name = %name,
                            media_type = %media_type,
                            size,
                            provider = self.storage.provider_type(),
                            error = %e,
                            "Storage upload failed"
                        );
                        storage_error(e)
                    })?;

                debug!(key = %stored.key, size, "Content stored");
                self.persist(stored.url, ShareOrigin::Upload, Some(name), Some(media_type))
                    .await
            }
            IssueInput::Url {
                url,
                file_name,
                media_type,
            } => {
                let url = url.trim().to_string();
                if url.is_empty() {
                    return Err(AppError::validation("A file or url is required"));
                }
                self.persist(url, ShareOrigin::Link, file_name, media_type)
                    .await
            }
        }
    }

    /// Issues a code for a file the client will upload straight to
    /// storage, returning the pre-signed upload URL alongside it.
    pub async fn begin_upload(&self, name: &str, media_type: &str) -> AppResult<UploadTicket> {
        if self.strategy != UploadStrategy::Direct {
            return Err(AppError::validation(
                "Direct uploads are disabled; post the file instead",
            ));
        }
        if name.trim().is_empty() {
            return Err(AppError::validation("file_name is required"));
        }
        if media_type.trim().is_empty() {
            return Err(AppError::validation("media_type is required"));
        }

        let session = self
            .storage
            .create_upload_session(name, media_type)
            .await
            .map_err(|e| {
                error!(
                    file_name = %name,
                    media_type = %media_type,
                    provider = self.storage.provider_type(),
                    error = %e,
                    "Failed to create upload session"
                );
                storage_error(e)
            })?;

        let record = self
            .persist(
                session.url,
                ShareOrigin::UploadSession,
                Some(name.to_string()),
                Some(media_type.to_string()),
            )
            .await?;

        Ok(UploadTicket {
            record,
            upload_url: session.upload_url,
            upload_expires_at: session.expires_at,
        })
    }

    /// Inserts the record under a fresh code, retrying on collisions.
    async fn persist(
        &self,
        url: String,
        origin: ShareOrigin,
        file_name: Option<String>,
        media_type: Option<String>,
    ) -> AppResult<ShareRecord> {
        let expires_at = match self.ttl {
            Some(ttl) => Some(Utc::now().checked_add_signed(ttl).ok_or_else(|| {
                AppError::configuration("share.ttl_seconds pushes expiry out of range")
            })?),
            None => None,
        };

        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();
            let candidate = NewShareRecord {
                code,
                url: url.clone(),
                origin,
                file_name: file_name.clone(),
                media_type: media_type.clone(),
                expires_at,
            };

            match self.store.insert(candidate).await {
                Ok(record) => {
                    info!(
                        code = %record.code,
                        origin = ?record.origin,
                        attempt,
                        expires_at = ?record.expires_at,
                        "Share issued"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_conflict() => {
                    debug!(code = %code, attempt, "Share code collision, retrying");
                }
                Err(e) => {
                    error!(
                        code = %code,
                        origin = ?origin,
                        backend = self.store.backend(),
                        error = %e,
                        "Failed to record share"
                    );
                    return Err(e);
                }
            }
        }

        warn!(
            attempts = self.max_attempts,
            width = self.generator.format().width(),
            "Share code space exhausted"
        );
        Err(AppError::issuance_exhausted(format!(
            "Could not allocate a unique code after {} attempts",
            self.max_attempts
        )))
    }
}

/// Storage failures keep their kind when they carry a meaningful one
/// (`NotImplemented`, `Configuration`); anything else becomes `Storage`.
fn storage_error(err: AppError) -> AppError {
    match err.kind {
        ErrorKind::Storage | ErrorKind::NotImplemented | ErrorKind::Configuration => err,
        _ => AppError::with_source(ErrorKind::Storage, "Failed to store file", err),
    }
}
