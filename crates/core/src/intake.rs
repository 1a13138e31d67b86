use bytes::Bytes;

use crate::case::NewCase;
use crate::types::UserId;

/// A single file submitted with an intake request.
#[derive(Debug, Clone)]
pub struct IntakeFile {
    /// Original filename.
    pub file_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File content.
    pub data: Bytes,
}

impl IntakeFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Size of the content in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Everything a client submits to open a case.
#[derive(Debug, Clone)]
pub struct IntakeRequest {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub files: Vec<IntakeFile>,
}

impl IntakeRequest {
    /// Split the request into the case row input and the files to upload.
    ///
    /// User id, title and description are trimmed; validation has already
    /// checked the trimmed forms.
    #[must_use]
    pub fn into_parts(self) -> (NewCase, Vec<IntakeFile>) {
        let case = NewCase {
            user_id: UserId::new(self.user_id.trim()),
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
        };
        (case, self.files)
    }
}
