use std::sync::Arc;

use lexcase_core::IntakeLimits;
use lexcase_repo::CaseRepository;
use lexcase_storage::ObjectStore;

use crate::error::IntakeError;
use crate::metrics::IntakeMetrics;
use crate::workflow::IntakeWorkflow;

/// Bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "case-files";

/// Uploads run in parallel per submission by default.
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 4;

/// Fluent builder for constructing an [`IntakeWorkflow`].
///
/// A [`CaseRepository`] and an [`ObjectStore`] must be supplied. Everything
/// else has a default.
pub struct IntakeWorkflowBuilder {
    repository: Option<Arc<dyn CaseRepository>>,
    storage: Option<Arc<dyn ObjectStore>>,
    bucket: String,
    limits: IntakeLimits,
    max_concurrent_uploads: usize,
    metrics: Option<Arc<IntakeMetrics>>,
}

impl IntakeWorkflowBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            storage: None,
            bucket: DEFAULT_BUCKET.to_owned(),
            limits: IntakeLimits::default(),
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
            metrics: None,
        }
    }

    /// Set the case repository implementation.
    #[must_use]
    pub fn repository(mut self, repository: Arc<dyn CaseRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Set the object store implementation.
    #[must_use]
    pub fn storage(mut self, storage: Arc<dyn ObjectStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the bucket that attachments are uploaded to.
    #[must_use]
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the request-level file limits.
    #[must_use]
    pub fn limits(mut self, limits: IntakeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set how many files of one submission may be uploaded at once.
    #[must_use]
    pub fn max_concurrent_uploads(mut self, n: usize) -> Self {
        self.max_concurrent_uploads = n;
        self
    }

    /// Share an existing metrics instance instead of creating a new one.
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<IntakeMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Consume the builder and produce an [`IntakeWorkflow`].
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] if a required component is
    /// missing, the bucket is empty, or the upload concurrency is zero.
    pub fn build(self) -> Result<IntakeWorkflow, IntakeError> {
        let repository = self
            .repository
            .ok_or_else(|| IntakeError::Configuration("case repository is required".into()))?;

        let storage = self
            .storage
            .ok_or_else(|| IntakeError::Configuration("object store is required".into()))?;

        if self.bucket.trim().is_empty() {
            return Err(IntakeError::Configuration(
                "storage bucket must not be empty".into(),
            ));
        }

        if self.max_concurrent_uploads == 0 {
            return Err(IntakeError::Configuration(
                "max_concurrent_uploads must be at least 1".into(),
            ));
        }

        Ok(IntakeWorkflow {
            repository,
            storage,
            bucket: self.bucket,
            limits: self.limits,
            max_concurrent_uploads: self.max_concurrent_uploads,
            metrics: self.metrics.unwrap_or_default(),
        })
    }
}

impl Default for IntakeWorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
