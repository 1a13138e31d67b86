use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::{debug, error, info, instrument, warn};

use lexcase_core::{
    CaseId, IntakeFile, IntakeLimits, IntakeRequest, NewAttachment, ValidationError,
    storage_path, validate_intake,
};
use lexcase_repo::CaseRepository;
use lexcase_storage::ObjectStore;

use crate::error::IntakeError;
use crate::metrics::IntakeMetrics;
use crate::outcome::{FileOutcome, FileStatus, IntakeOutcome};

/// Orchestrates a case intake: validation, case creation, then upload and
/// registration of each attached file.
///
/// Construct with [`IntakeWorkflowBuilder`](crate::IntakeWorkflowBuilder).
pub struct IntakeWorkflow {
    pub(crate) repository: Arc<dyn CaseRepository>,
    pub(crate) storage: Arc<dyn ObjectStore>,
    pub(crate) bucket: String,
    pub(crate) limits: IntakeLimits,
    pub(crate) max_concurrent_uploads: usize,
    pub(crate) metrics: Arc<IntakeMetrics>,
}

impl IntakeWorkflow {
    /// Submit a new case with its attachments.
    ///
    /// Validation runs before anything is persisted and reports every invalid
    /// field. Once the case row exists the call succeeds: each file is
    /// uploaded and registered independently, and a file that fails either
    /// step is logged and left out of the case. The returned outcome lists
    /// every file in submission order.
    ///
    /// # Errors
    ///
    /// - [`IntakeError::Validation`] if the request is invalid. Nothing was
    ///   written.
    /// - [`IntakeError::Persistence`] if the case row could not be created. No
    ///   file was uploaded.
    #[instrument(
        name = "intake.submit",
        skip_all,
        fields(user_id = %request.user_id, files = request.files.len())
    )]
    pub async fn submit(&self, request: IntakeRequest) -> Result<IntakeOutcome, IntakeError> {
        self.metrics.increment_submitted();

        if let Err(e) = validate_intake(&request, &self.limits) {
            self.record_rejection(&e);
            return Err(e.into());
        }

        let (new_case, files) = request.into_parts();

        let case = match self.repository.create_case(new_case).await {
            Ok(case) => case,
            Err(e) => {
                self.metrics.increment_case_failures();
                error!(error = %e, "failed to create case");
                return Err(e.into());
            }
        };
        self.metrics.increment_cases_created();
        info!(case_id = %case.id, "case created");

        let case_id = case.id;
        let mut outcomes: Vec<FileOutcome> = stream::iter(files.into_iter().enumerate())
            .map(|(index, file)| self.process_file(case_id, index, file))
            .buffer_unordered(self.max_concurrent_uploads)
            .collect()
            .await;
        outcomes.sort_by_key(|o| o.index);

        let outcome = IntakeOutcome {
            case,
            files: outcomes,
        };
        info!(
            case_id = %case_id,
            stored = outcome.files.len() - outcome.failed_count(),
            failed = outcome.failed_count(),
            "intake complete"
        );
        Ok(outcome)
    }

    /// Count a submission that was refused before it could be turned into an
    /// [`IntakeRequest`], e.g. because a file body failed to decode.
    pub fn reject(&self, error: &ValidationError) {
        self.metrics.increment_submitted();
        self.record_rejection(error);
    }

    fn record_rejection(&self, error: &ValidationError) {
        self.metrics.increment_rejected();
        debug!(error = %error, fields = error.fields.len(), "intake rejected");
    }

    /// Upload one file and register it against `case_id`.
    ///
    /// Never fails; errors are logged and returned as a [`FileStatus`].
    async fn process_file(&self, case_id: CaseId, index: usize, file: IntakeFile) -> FileOutcome {
        let path = storage_path(&case_id, &file.file_name);
        let file_size = file.size();
        let IntakeFile {
            file_name,
            mime_type,
            data,
        } = file;

        let stored = match self
            .storage
            .put(&self.bucket, &path, &mime_type, data)
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                self.metrics.increment_upload_failures();
                warn!(
                    case_id = %case_id,
                    file_name = %file_name,
                    error = %e,
                    "attachment upload failed, skipping file"
                );
                return FileOutcome {
                    index,
                    file_name,
                    status: FileStatus::UploadFailed(e),
                };
            }
        };

        let attachment = NewAttachment {
            case_id,
            storage_bucket: stored.bucket.clone(),
            storage_path: stored.path.clone(),
            file_name: file_name.clone(),
            file_size,
            mime_type,
        };

        let status = match self.repository.add_attachment(attachment).await {
            Ok(attachment) => {
                self.metrics.increment_attachments_stored();
                debug!(
                    case_id = %case_id,
                    attachment_id = %attachment.id,
                    storage_path = %attachment.storage_path,
                    "attachment registered"
                );
                FileStatus::Stored(attachment)
            }
            Err(e) => {
                self.metrics.increment_registration_failures();
                warn!(
                    case_id = %case_id,
                    file_name = %file_name,
                    storage_path = %stored.path,
                    error = %e,
                    "attachment registration failed, object left unreferenced"
                );
                FileStatus::RegistrationFailed { stored, error: e }
            }
        };

        FileOutcome {
            index,
            file_name,
            status,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn limits(&self) -> &IntakeLimits {
        &self.limits
    }

    pub fn metrics(&self) -> &Arc<IntakeMetrics> {
        &self.metrics
    }
}
