use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AttachmentId, CaseId};

/// Metadata row for a file that was successfully uploaded for a case.
///
/// Attachments are only ever created after the object store confirmed the
/// upload, and are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Attachment {
    /// Unique row identifier.
    pub id: AttachmentId,
    /// Case this file belongs to.
    pub case_id: CaseId,
    /// Object store bucket holding the file.
    pub storage_bucket: String,
    /// Object key within the bucket. Unique per upload.
    pub storage_path: String,
    /// Original filename as submitted by the client.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: u64,
    /// MIME type declared at upload (e.g. `"application/pdf"`).
    pub mime_type: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Input for registering an uploaded file against a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub case_id: CaseId,
    pub storage_bucket: String,
    pub storage_path: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
}

impl NewAttachment {
    /// Materialize an [`Attachment`] with the given identifier and timestamp.
    #[must_use]
    pub fn into_attachment(self, id: AttachmentId, now: DateTime<Utc>) -> Attachment {
        Attachment {
            id,
            case_id: self.case_id,
            storage_bucket: self.storage_bucket,
            storage_path: self.storage_path,
            file_name: self.file_name,
            file_size: self.file_size,
            mime_type: self.mime_type,
            created_at: now,
        }
    }
}

/// Build a fresh object key for a file uploaded to `case_id`.
///
/// The key is `{case_id}/{random uuid}{.ext}`, where `.ext` is the lower-cased
/// extension of `file_name`. Each call yields a new key, so two uploads of the
/// same file never collide.
#[must_use]
pub fn storage_path(case_id: &CaseId, file_name: &str) -> String {
    let object = Uuid::new_v4();
    match file_extension(file_name) {
        Some(ext) => format!("{case_id}/{object}.{ext}"),
        None => format!("{case_id}/{object}"),
    }
}

/// Extract a safe, lower-cased extension from a client-supplied filename.
///
/// Anything that is not plain ASCII alphanumerics is dropped so a hostile
/// name can never inject path separators into the object key.
fn file_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 16 || !ext.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_keeps_lowercased_extension() {
        let case_id = CaseId::generate();
        let path = storage_path(&case_id, "Contrato.PDF");
        assert!(path.starts_with(&format!("{case_id}/")));
        assert!(path.ends_with(".pdf"));
    }

    #[test]
    fn path_without_extension() {
        let case_id = CaseId::generate();
        let path = storage_path(&case_id, "README");
        let object = path.strip_prefix(&format!("{case_id}/")).unwrap();
        assert!(Uuid::parse_str(object).is_ok());
    }

    #[test]
    fn same_file_twice_yields_distinct_paths() {
        let case_id = CaseId::generate();
        let a = storage_path(&case_id, "evidence.jpg");
        let b = storage_path(&case_id, "evidence.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn hostile_extension_is_dropped() {
        assert_eq!(file_extension("x.p/../df"), None);
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension(".hidden"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn new_attachment_materializes() {
        let case_id = CaseId::generate();
        let id = AttachmentId::generate();
        let now = Utc::now();
        let attachment = NewAttachment {
            case_id,
            storage_bucket: "case-files".into(),
            storage_path: storage_path(&case_id, "a.pdf"),
            file_name: "a.pdf".into(),
            file_size: 42,
            mime_type: "application/pdf".into(),
        }
        .into_attachment(id, now);

        assert_eq!(attachment.id, id);
        assert_eq!(attachment.case_id, case_id);
        assert_eq!(attachment.file_size, 42);
        assert_eq!(attachment.created_at, now);
    }
}
