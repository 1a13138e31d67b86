use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageError;
use crate::types::StoredObject;

/// Pluggable object storage backend for case attachments.
///
/// The store has no relational awareness: it writes bytes under a key and
/// reports whether that worked. Callers are responsible for choosing unique
/// keys. Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` to `(bucket, path)`.
    ///
    /// The destination must not already exist. Backends that can detect an
    /// existing object return [`StorageError::AlreadyExists`]. No retry is
    /// attempted.
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, StorageError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
