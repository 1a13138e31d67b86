use std::sync::Arc;

use lexcase_storage::ObjectStore;
use lexcase_storage_memory::MemoryObjectStore;
#[cfg(feature = "s3")]
use lexcase_storage_s3::{S3Config, S3ObjectStore};

use crate::config::StorageConfig;
use crate::error::ServerError;

/// Construct an [`ObjectStore`] from configuration.
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, ServerError> {
    if config.bucket.trim().is_empty() {
        return Err(ServerError::Config(
            "storage bucket must not be empty".into(),
        ));
    }

    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryObjectStore::new())),
        #[cfg(feature = "s3")]
        "s3" => Ok(create_s3(config).await),
        other => Err(ServerError::Config(format!(
            "unsupported storage backend: {other} (is the feature enabled?)"
        ))),
    }
}

#[cfg(feature = "s3")]
async fn create_s3(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    Arc::new(S3ObjectStore::new(s3_config(config)).await)
}

#[cfg(feature = "s3")]
fn s3_config(config: &StorageConfig) -> S3Config {
    let mut s3_config = S3Config::new(config.region.as_deref().unwrap_or("us-east-1"));
    if let Some(endpoint) = &config.endpoint_url {
        s3_config = s3_config.with_endpoint_url(endpoint.clone());
    }
    if let Some(prefix) = &config.prefix {
        s3_config = s3_config.with_prefix(prefix.clone());
    }
    if let Some(role_arn) = &config.role_arn {
        s3_config = s3_config.with_role_arn(role_arn.clone());
    }
    if let Some(force) = config.force_path_style {
        s3_config.force_path_style = force;
    }
    if let Some(conditional) = config.conditional_writes {
        s3_config.conditional_writes = conditional;
    }
    s3_config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend() {
        assert!(create_storage(&StorageConfig::default()).await.is_ok());
    }

    #[tokio::test]
    async fn empty_bucket_is_rejected() {
        let config = StorageConfig {
            bucket: String::new(),
            ..StorageConfig::default()
        };
        assert!(matches!(
            create_storage(&config).await,
            Err(ServerError::Config(_))
        ));
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        let config = StorageConfig {
            backend: "ftp".into(),
            ..StorageConfig::default()
        };
        assert!(matches!(
            create_storage(&config).await,
            Err(ServerError::Config(msg)) if msg.contains("ftp")
        ));
    }

    #[cfg(feature = "s3")]
    #[test]
    fn s3_options_are_forwarded() {
        let config = StorageConfig {
            backend: "s3".into(),
            region: Some("eu-west-1".into()),
            endpoint_url: Some("http://minio:9000".into()),
            prefix: Some("cases/".into()),
            conditional_writes: Some(false),
            ..StorageConfig::default()
        };
        let s3 = s3_config(&config);
        assert_eq!(s3.region, "eu-west-1");
        assert_eq!(s3.prefix.as_deref(), Some("cases/"));
        assert!(s3.force_path_style);
        assert!(!s3.conditional_writes);
    }

    #[cfg(feature = "s3")]
    #[test]
    fn s3_conditional_writes_default_on() {
        let s3 = s3_config(&StorageConfig::default());
        assert!(s3.conditional_writes);
        assert!(!s3.force_path_style);
    }
}
