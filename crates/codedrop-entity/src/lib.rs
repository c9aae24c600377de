//! # codedrop-entity
//!
//! Domain entity models for CodeDrop. The only persisted entity is the
//! [`ShareRecord`](share::ShareRecord) mapping a short code to a URL.

pub mod share;
