use async_trait::async_trait;

use lexcase_core::{Attachment, Case, CaseId, CaseStatus, NewAttachment, NewCase, UserId};

use crate::error::RepoError;

/// Relational persistence for cases and their attachment metadata.
///
/// The repository enforces persistence-level constraints only (identifier
/// generation, foreign keys). Business rules such as title and description
/// requirements are checked before it is called.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Insert a new case with a freshly generated identifier and `pending`
    /// status.
    ///
    /// Not idempotent: two calls with identical input create two cases.
    async fn create_case(&self, case: NewCase) -> Result<Case, RepoError>;

    /// Register metadata for an uploaded file.
    ///
    /// Returns [`RepoError::CaseNotFound`] if the owning case does not exist.
    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, RepoError>;

    /// Fetch a single case. Returns `None` if it does not exist.
    async fn get_case(&self, id: CaseId) -> Result<Option<Case>, RepoError>;

    /// All cases owned by `user_id`, newest first.
    async fn list_cases(&self, user_id: &UserId) -> Result<Vec<Case>, RepoError>;

    /// All attachments registered for `case_id`, oldest first.
    ///
    /// An unknown case yields an empty list.
    async fn list_attachments(&self, case_id: CaseId) -> Result<Vec<Attachment>, RepoError>;

    /// Move a case to `status` and bump its `updated_at`.
    ///
    /// Returns [`RepoError::CaseNotFound`] if the case does not exist.
    async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case, RepoError>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
