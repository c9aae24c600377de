//! Unified application error types for CodeDrop.
//!
//! Every crate reports failures as [`AppError`], so `?` works across crate
//! boundaries. Collaborator failures (database, object storage) are
//! translated into one of these kinds at the service boundary and never
//! surface as raw driver errors.

use std::fmt;
use thiserror::Error;

/// What went wrong, independent of which collaborator reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested share code is unknown, expired, or already consumed.
    NotFound,
    /// Input validation failed (missing field, malformed code).
    Validation,
    /// The record store rejected an insert because the code is taken.
    Conflict,
    /// Every candidate code collided within the retry budget.
    IssuanceExhausted,
    /// The object storage collaborator failed.
    Storage,
    /// The record store or another backing service failed.
    Dependency,
    /// The request body exceeded the configured upload limit.
    PayloadTooLarge,
    /// A rate limit was exceeded.
    RateLimited,
    /// A configuration error occurred.
    Configuration,
    /// JSON encoding or decoding failed.
    Serialization,
    /// The requested feature is not supported by the active provider.
    NotImplemented,
    /// Anything else on the server side.
    Internal,
}

impl ErrorKind {
    /// Whether this kind represents a failure on the server side
    /// (as opposed to a problem with the caller's input).
    pub fn is_server_error(&self) -> bool {
        !matches!(
            self,
            Self::NotFound
                | Self::Validation
                | Self::Conflict
                | Self::PayloadTooLarge
                | Self::RateLimited
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::IssuanceExhausted => write!(f, "ISSUANCE_EXHAUSTED"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Dependency => write!(f, "DEPENDENCY"),
            Self::PayloadTooLarge => write!(f, "PAYLOAD_TOO_LARGE"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::NotImplemented => write!(f, "NOT_IMPLEMENTED"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout CodeDrop.
///
/// Driver errors (sqlx, the AWS SDK, I/O) are wrapped with `with_source`
/// so the cause chain survives for logging while the HTTP layer only looks
/// at `kind` and `message`.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict (duplicate key) error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an issuance-exhausted error.
    pub fn issuance_exhausted(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IssuanceExhausted, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a dependency error.
    pub fn dependency(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dependency, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a not-implemented error.
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is the record store's duplicate-key signal.
    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
