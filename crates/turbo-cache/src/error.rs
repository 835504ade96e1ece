//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to perform store operation.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// The backing document of a file store could not be parsed.
    #[error("Corrupt store document: {0}")]
    CorruptDocument(String),

    /// Filesystem failure in a file-backed store.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// True when stored bytes exist but could not be decoded, either as the
    /// requested value or as the document holding it.
    pub fn is_corrupt_value(&self) -> bool {
        match self {
            CacheError::SerializeError(e) => !e.is_io(),
            CacheError::CorruptDocument(_) => true,
            _ => false,
        }
    }
}
