//! Share record domain entities.

pub mod model;

pub use model::{NewShareRecord, ShareOrigin, ShareRecord};
