//! Storage abstraction for persistence.
//!
//! A document is persisted as one JSON snapshot. Loading decodes the whole
//! snapshot or fails without touching the caller's state; the decoded
//! document always comes back with its selection cleared.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::Document;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document storage backends.
///
/// Implementations can store documents in memory or on the filesystem.
/// The engine is single-threaded and never blocks on anything but local
/// IO, so the interface is synchronous.
pub trait Storage: Send + Sync {
    /// Save a document.
    fn save(&self, id: &str, document: &Document) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, id: &str) -> StorageResult<Document>;

    /// Delete a document.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all document IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
