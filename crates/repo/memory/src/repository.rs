use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use lexcase_core::{
    Attachment, AttachmentId, Case, CaseId, CaseStatus, NewAttachment, NewCase, UserId,
};
use lexcase_repo::error::RepoError;
use lexcase_repo::repository::CaseRepository;

/// A case together with its insertion sequence number.
#[derive(Debug, Clone)]
struct Row {
    seq: u64,
    case: Case,
}

/// In-memory case repository using `DashMap`. Suitable for development and
/// testing.
///
/// Cases are keyed by ID with a secondary index from case ID to its
/// attachments in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCaseRepository {
    cases: DashMap<CaseId, Row>,
    attachments: DashMap<CaseId, Vec<Attachment>>,
    next_seq: AtomicU64,
}

impl MemoryCaseRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored cases.
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    /// Number of stored attachments across all cases.
    pub fn attachment_count(&self) -> usize {
        self.attachments.iter().map(|e| e.value().len()).sum()
    }
}

#[async_trait]
impl CaseRepository for MemoryCaseRepository {
    async fn create_case(&self, case: NewCase) -> Result<Case, RepoError> {
        let case = case.into_case(CaseId::generate(), Utc::now());
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.cases.insert(
            case.id,
            Row {
                seq,
                case: case.clone(),
            },
        );
        Ok(case)
    }

    async fn add_attachment(&self, attachment: NewAttachment) -> Result<Attachment, RepoError> {
        let case_id = attachment.case_id;
        if !self.cases.contains_key(&case_id) {
            return Err(RepoError::CaseNotFound(case_id));
        }
        let attachment = attachment.into_attachment(AttachmentId::generate(), Utc::now());
        self.attachments
            .entry(case_id)
            .or_default()
            .push(attachment.clone());
        Ok(attachment)
    }

    async fn get_case(&self, id: CaseId) -> Result<Option<Case>, RepoError> {
        Ok(self.cases.get(&id).map(|r| r.value().case.clone()))
    }

    async fn list_cases(&self, user_id: &UserId) -> Result<Vec<Case>, RepoError> {
        let mut rows: Vec<Row> = self
            .cases
            .iter()
            .filter(|entry| &entry.value().case.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        // Newest first.
        rows.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(rows.into_iter().map(|r| r.case).collect())
    }

    async fn list_attachments(&self, case_id: CaseId) -> Result<Vec<Attachment>, RepoError> {
        Ok(self
            .attachments
            .get(&case_id)
            .map(|list| list.value().clone())
            .unwrap_or_default())
    }

    async fn update_status(&self, id: CaseId, status: CaseStatus) -> Result<Case, RepoError> {
        let mut row = self.cases.get_mut(&id).ok_or(RepoError::CaseNotFound(id))?;
        let case = &mut row.value_mut().case;
        case.status = status;
        case.updated_at = Utc::now().max(case.created_at);
        Ok(case.clone())
    }
}
