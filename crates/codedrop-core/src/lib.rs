//! # codedrop-core
//!
//! Core crate for CodeDrop. Contains the collaborator traits, configuration
//! schemas, the share code type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CodeDrop crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
