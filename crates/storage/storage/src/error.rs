use thiserror::Error;

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An object already exists at the destination path.
    #[error("object already exists: {bucket}/{path}")]
    AlreadyExists {
        /// Target bucket.
        bucket: String,
        /// Target object key.
        path: String,
    },

    /// The backend throttled the request.
    #[error("storage request throttled")]
    Throttled,

    /// The request timed out.
    #[error("storage request timed out")]
    Timeout,

    /// A network or connection error occurred.
    #[error("storage connection error: {0}")]
    Connection(String),

    /// The backend is misconfigured (missing bucket, bad credentials, ...).
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
