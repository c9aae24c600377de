//! # codedrop-storage
//!
//! Object storage providers for CodeDrop. Supports the local filesystem
//! and S3-compatible object stores.

pub mod key;
pub mod manager;
pub mod mime;
pub mod providers;

pub use manager::StorageManager;
