//! Shared domain types.

pub mod share_code;

pub use share_code::{CodeFormat, ShareCode};
