//! # codedrop-database
//!
//! PostgreSQL connection management and the share record store, with an
//! in-memory implementation of the same contract for development and
//! tests.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryShareRecordStore, ShareRecordRepository, ShareRecordStore};
