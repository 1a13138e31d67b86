use async_trait::async_trait;
use aws_config::Region;
use aws_config::sts::AssumeRoleProvider;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, error, info, instrument};

use lexcase_storage::error::StorageError;
use lexcase_storage::store::ObjectStore;
use lexcase_storage::types::StoredObject;

use crate::config::S3Config;
use crate::error::classify_sdk_error;

/// [`ObjectStore`] that writes case attachments to Amazon S3.
pub struct S3ObjectStore {
    config: S3Config,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish()
    }
}

/// STS session name reported when `role_arn` is configured.
const ROLE_SESSION_NAME: &str = "lexcase-storage";

impl S3ObjectStore {
    /// Create a new `S3ObjectStore`.
    ///
    /// Credentials come from the standard AWS environment chain. When
    /// `role_arn` is set they are only used to assume that role through STS,
    /// and the S3 client signs with the role's refreshed credentials.
    pub async fn new(config: S3Config) -> Self {
        let region = Region::new(config.region.clone());
        let mut loader = aws_config::from_env().region(region.clone());
        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "using custom S3 endpoint");
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.force_path_style);

        if let Some(role_arn) = &config.role_arn {
            info!(session_name = ROLE_SESSION_NAME, "assuming IAM role for S3 access");
            let provider = AssumeRoleProvider::builder(role_arn)
                .session_name(ROLE_SESSION_NAME)
                .region(region)
                .configure(&sdk_config)
                .build()
                .await;
            builder = builder.credentials_provider(provider);
        }

        let client = aws_sdk_s3::Client::from_conf(builder.build());
        Self { config, client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, data), fields(backend = "s3", size = data.len()))]
    async fn put(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StoredObject, StorageError> {
        let key = self.config.prefixed_key(path);
        let stored = StoredObject::describe(bucket, &key, content_type, &data);

        debug!(bucket = %bucket, key = %key, "uploading object to S3");

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .content_type(content_type)
            .metadata("sha256", &stored.checksum_sha256)
            .body(ByteStream::from(data));

        if self.config.conditional_writes {
            request = request.if_none_match("*");
        }

        request.send().await.map_err(|e| {
            if e.code() == Some("PreconditionFailed") {
                return StorageError::AlreadyExists {
                    bucket: bucket.to_owned(),
                    path: key.clone(),
                };
            }
            let err_str = DisplayErrorContext(&e).to_string();
            error!(error = %err_str, "S3 put_object failed");
            classify_sdk_error(&err_str)
        })?;

        info!(bucket = %bucket, key = %key, "S3 object uploaded");
        Ok(stored)
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn health_check(&self) -> Result<(), StorageError> {
        self.client
            .list_buckets()
            .max_buckets(1)
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, "S3 health check failed");
                StorageError::Connection(format!("S3 health check failed: {err_str}"))
            })?;
        Ok(())
    }
}
