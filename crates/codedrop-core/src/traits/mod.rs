//! Collaborator traits implemented by other CodeDrop crates.

pub mod storage;

pub use storage::{StorageProvider, StoredObject, UploadSession};
