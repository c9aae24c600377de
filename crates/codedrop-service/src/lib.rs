//! # codedrop-service
//!
//! Business logic for CodeDrop. The issuance service stores content (or
//! accepts an existing URL) and mints a unique short code for it; the
//! redemption service resolves a code back to its URL.
//!
//! Services follow constructor injection: the record store and storage
//! provider are built once at startup and passed in as `Arc`s.

pub mod share;

pub use share::{
    CodeGenerator, IssuanceService, IssueInput, PurgeService, RedemptionService, UploadTicket,
};
