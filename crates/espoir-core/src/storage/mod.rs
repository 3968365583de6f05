// ── Durable local storage ──
//
// Typed key-value persistence for the session, favorites, and theme
// slices. Backends are swappable; the gateway owns the key namespace
// and the serde round-trip per key.

mod backend;
mod gateway;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use gateway::{PersistenceGateway, StorageKey};

use thiserror::Error;

/// Failure modes of the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}
