pub mod attachment;
pub mod case;
pub mod intake;
pub mod types;
pub mod validation;

pub use attachment::{Attachment, NewAttachment, storage_path};
pub use case::{Case, CaseStatus, NewCase, UnknownStatus};
pub use intake::{IntakeFile, IntakeRequest};
pub use types::{AttachmentId, CaseId, UserId};
pub use validation::{
    FieldError, FieldErrors, IntakeLimits, MIN_DESCRIPTION_CHARS, ValidationError,
    validate_intake,
};
