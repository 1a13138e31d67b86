use lexcase_core::CaseId;
use thiserror::Error;

/// Errors from case repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("case not found: {0}")]
    CaseNotFound(CaseId),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("backend error: {0}")]
    Backend(String),
}
