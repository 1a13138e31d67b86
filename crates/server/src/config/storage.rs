use serde::Deserialize;

/// Configuration for the object storage backend.
///
/// # Example
///
/// ```toml
/// [storage]
/// backend = "s3"
/// bucket = "case-files"
/// region = "eu-west-1"
/// endpoint_url = "http://localhost:4566"
/// ```
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use: `"memory"` or `"s3"`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Bucket that attachments are written to.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// AWS region for the `s3` backend.
    pub region: Option<String>,

    /// Endpoint override for S3-compatible local services.
    pub endpoint_url: Option<String>,

    /// Key prefix prepended to every object path.
    pub prefix: Option<String>,

    /// IAM role to assume via STS.
    pub role_arn: Option<String>,

    /// Force path-style bucket addressing. Implied by `endpoint_url`.
    pub force_path_style: Option<bool>,

    /// Refuse to overwrite existing keys with `If-None-Match: *`. On by
    /// default; turn off for S3-compatible services without conditional puts.
    pub conditional_writes: Option<bool>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            bucket: default_bucket(),
            region: None,
            endpoint_url: None,
            prefix: None,
            role_arn: None,
            force_path_style: None,
            conditional_writes: None,
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

fn default_bucket() -> String {
    "case-files".to_owned()
}
