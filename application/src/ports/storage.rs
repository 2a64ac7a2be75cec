//! Key-value storage port
//!
//! The persistent store is a flat map from fixed string keys to JSON text.
//! Each entity collection lives under one key.

use thiserror::Error;

/// Errors raised by a backing key-value store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Durable string-keyed store.
///
/// Implementations (adapters) live in the infrastructure layer. Reads and
/// writes are synchronous.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value under `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
