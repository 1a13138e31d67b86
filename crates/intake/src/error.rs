use thiserror::Error;

use lexcase_core::ValidationError;
use lexcase_repo::RepoError;

/// Errors that abort an intake submission.
///
/// Per-file upload and registration failures never surface here; they are
/// reported through [`FileOutcome`](crate::outcome::FileOutcome).
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The request was rejected before anything was persisted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The case row could not be created. No files were processed.
    #[error("persistence error: {0}")]
    Persistence(#[from] RepoError),

    /// The workflow was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}
