use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Receipt for an object written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Bucket the object was written to.
    pub bucket: String,
    /// Object key within the bucket.
    pub path: String,
    /// MIME content type recorded with the object.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// `SHA-256` hex digest of the content.
    pub checksum_sha256: String,
}

impl StoredObject {
    /// Describe `data` as written to `(bucket, path)`, computing its checksum.
    pub fn describe(bucket: &str, path: &str, content_type: &str, data: &Bytes) -> Self {
        Self {
            bucket: bucket.to_owned(),
            path: path.to_owned(),
            content_type: content_type.to_owned(),
            size_bytes: data.len() as u64,
            checksum_sha256: sha256_hex(data),
        }
    }
}

/// Hex-encoded `SHA-256` digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
