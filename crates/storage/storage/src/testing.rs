use bytes::Bytes;

use crate::error::StorageError;
use crate::store::ObjectStore;
use crate::types::sha256_hex;

/// Run the object store conformance test suite against `bucket`.
///
/// Call this from your backend's test module with a fresh store instance.
/// Each run writes under a unique prefix so it can be repeated against a
/// shared live bucket.
///
/// # Errors
///
/// Returns an error if a store operation fails unexpectedly.
pub async fn run_store_conformance_tests(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<(), StorageError> {
    test_put_reports_metadata(store, bucket, prefix).await?;
    test_put_distinct_paths(store, bucket, prefix).await?;
    test_put_empty_object(store, bucket, prefix).await?;
    test_health_check(store).await?;
    Ok(())
}

async fn test_put_reports_metadata(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<(), StorageError> {
    let path = format!("{prefix}/metadata.pdf");
    let data = Bytes::from_static(b"%PDF-1.7 conformance");
    let stored = store
        .put(bucket, &path, "application/pdf", data.clone())
        .await?;

    assert_eq!(stored.bucket, bucket);
    assert_eq!(stored.path, path);
    assert_eq!(stored.content_type, "application/pdf");
    assert_eq!(stored.size_bytes, data.len() as u64);
    assert_eq!(stored.checksum_sha256, sha256_hex(&data));
    Ok(())
}

async fn test_put_distinct_paths(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<(), StorageError> {
    let data = Bytes::from_static(b"same content, two keys");
    let a = store
        .put(bucket, &format!("{prefix}/a.txt"), "text/plain", data.clone())
        .await?;
    let b = store
        .put(bucket, &format!("{prefix}/b.txt"), "text/plain", data)
        .await?;

    assert_ne!(a.path, b.path, "distinct keys must both be stored");
    assert_eq!(a.checksum_sha256, b.checksum_sha256);
    Ok(())
}

async fn test_put_empty_object(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: &str,
) -> Result<(), StorageError> {
    let stored = store
        .put(bucket, &format!("{prefix}/empty"), "text/plain", Bytes::new())
        .await?;
    assert_eq!(stored.size_bytes, 0);
    Ok(())
}

async fn test_health_check(store: &dyn ObjectStore) -> Result<(), StorageError> {
    store.health_check().await
}
