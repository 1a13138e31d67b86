use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use lexcase_storage::error::StorageError;
use lexcase_storage::store::ObjectStore;
use lexcase_storage::types::StoredObject;

/// A stored object: content type plus content.
#[derive(Debug, Clone)]
struct Object {
    content_type: String,
    data: Bytes,
}

/// In-memory [`ObjectStore`] backed by a [`DashMap`] keyed by `(bucket, path)`.
///
/// Writes to an existing key are rejected with
/// [`StorageError::AlreadyExists`], so this backend also verifies that callers
/// never reuse object keys.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<(String, String), Object>,
}

impl MemoryObjectStore {
    /// Create a new, empty in-memory object store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the content type and content stored at `(bucket, path)`.
    pub fn get(&self, bucket: &str, path: &str) -> Option<(String, Bytes)> {
        self.objects
            .get(&(bucket.to_owned(), path.to_owned()))
            .map(|o| (o.content_type.clone(), o.data.clone()))
    }

    /// All object keys stored in `bucket`, sorted.
    pub fn paths(&self, bucket: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .iter()
            .filter(|e| e.key().0 == bucket)
            .map(|e| e.key().1.clone())
            .collect();
        paths.sort();
        paths
    }

    /// Total number of stored objects across all buckets.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, StorageError> {
        let stored = StoredObject::describe(bucket, path, content_type, &data);

        // `entry` holds the shard lock, so check-then-insert is atomic.
        match self.objects.entry((bucket.to_owned(), path.to_owned())) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists {
                bucket: bucket.to_owned(),
                path: path.to_owned(),
            }),
            Entry::Vacant(vacant) => {
                vacant.insert(Object {
                    content_type: content_type.to_owned(),
                    data,
                });
                debug!(bucket, path, size = stored.size_bytes, "object stored in memory");
                Ok(stored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use lexcase_storage::testing::run_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryObjectStore::new();
        run_store_conformance_tests(&store, "case-files", "conformance")
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryObjectStore::new();
        store
            .put("b", "c/1.png", "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .unwrap();

        let (content_type, data) = store.get("b", "c/1.png").unwrap();
        assert_eq!(content_type, "image/png");
        assert_eq!(&data[..], b"\x89PNG");
        assert!(store.get("other", "c/1.png").is_none());
    }

    #[tokio::test]
    async fn existing_path_is_rejected() {
        let store = MemoryObjectStore::new();
        store
            .put("b", "c/1.txt", "text/plain", Bytes::from_static(b"first"))
            .await
            .unwrap();

        let err = store
            .put("b", "c/1.txt", "text/plain", Bytes::from_static(b"second"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists { .. }));

        let (_, data) = store.get("b", "c/1.txt").unwrap();
        assert_eq!(&data[..], b"first", "original object must be untouched");
    }

    #[tokio::test]
    async fn buckets_are_independent() {
        let store = MemoryObjectStore::new();
        let data = Bytes::from_static(b"x");
        store.put("a", "k", "text/plain", data.clone()).await.unwrap();
        store.put("b", "k", "text/plain", data).await.unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.paths("a"), vec!["k".to_owned()]);
    }
}
