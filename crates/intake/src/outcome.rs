use lexcase_core::{Attachment, Case, CaseId};
use lexcase_repo::RepoError;
use lexcase_storage::{StorageError, StoredObject};

/// What happened to a single submitted file.
#[derive(Debug)]
pub enum FileStatus {
    /// Uploaded and registered.
    Stored(Attachment),
    /// The object store rejected the upload. Nothing was registered.
    UploadFailed(StorageError),
    /// The upload succeeded but the attachment row could not be written.
    /// The object remains in the store unreferenced.
    RegistrationFailed {
        stored: StoredObject,
        error: RepoError,
    },
}

/// Per-file result of an intake submission.
#[derive(Debug)]
pub struct FileOutcome {
    /// Position of the file in the submitted request.
    pub index: usize,
    pub file_name: String,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self.status, FileStatus::Stored(_))
    }

    /// The registered attachment, if the file was stored.
    pub fn attachment(&self) -> Option<&Attachment> {
        match &self.status {
            FileStatus::Stored(attachment) => Some(attachment),
            _ => None,
        }
    }
}

/// Result of a successful intake submission: the created case plus one
/// [`FileOutcome`] per submitted file, in submission order.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub case: Case,
    pub files: Vec<FileOutcome>,
}

impl IntakeOutcome {
    pub fn case_id(&self) -> CaseId {
        self.case.id
    }

    /// Attachments that were registered.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.files.iter().filter_map(FileOutcome::attachment)
    }

    /// Number of files that were not registered.
    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| !f.is_stored()).count()
    }
}
