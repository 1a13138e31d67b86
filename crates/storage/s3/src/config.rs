use serde::{Deserialize, Serialize};

/// Configuration for the S3 object store.
///
/// Contains the region, an optional endpoint URL override for local
/// development (e.g. `LocalStack`), and optional STS assume-role settings for
/// cross-account buckets.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region (e.g. `"us-east-1"`).
    #[serde(default = "default_region")]
    pub region: String,

    /// Optional endpoint URL override for local development.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Optional IAM role ARN to assume via STS.
    #[serde(default)]
    pub role_arn: Option<String>,

    /// Key prefix prepended to every object path (e.g. `"lexcase/"`).
    #[serde(default)]
    pub prefix: Option<String>,

    /// Address buckets by path instead of virtual host. Needed by most
    /// S3-compatible local endpoints.
    #[serde(default)]
    pub force_path_style: bool,

    /// Send `If-None-Match: *` so S3 refuses to overwrite an existing key.
    #[serde(default = "default_conditional_writes")]
    pub conditional_writes: bool,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("role_arn", &self.role_arn.as_ref().map(|_| "[REDACTED]"))
            .field("prefix", &self.prefix)
            .field("force_path_style", &self.force_path_style)
            .field("conditional_writes", &self.conditional_writes)
            .finish()
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
            role_arn: None,
            prefix: None,
            force_path_style: false,
            conditional_writes: default_conditional_writes(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_conditional_writes() -> bool {
    true
}

impl S3Config {
    /// Create a new `S3Config` with the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Self::default()
        }
    }

    /// Set an endpoint URL override. Also switches to path-style addressing.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self.force_path_style = true;
        self
    }

    /// Set an IAM role ARN to assume via STS.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Apply the configured prefix to an object path.
    pub(crate) fn prefixed_key(&self, path: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{path}"),
            None => path.to_owned(),
        }
    }
}
