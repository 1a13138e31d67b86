use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intake::IntakeRequest;

/// Minimum number of characters in a case description.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// A single invalid field and why it was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field path, e.g. `"title"` or `"files[2].file_name"`.
    #[cfg_attr(feature = "openapi", schema(example = "description"))]
    pub field: String,
    /// Human-readable reason.
    #[cfg_attr(feature = "openapi", schema(example = "must be at least 10 characters"))]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Intake input was rejected. Lists every invalid field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", join_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Whether `field` is among the rejected fields.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Request-level limits on submitted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeLimits {
    /// Maximum number of files per request.
    pub max_files: usize,
    /// Maximum size of a single file in bytes.
    pub max_file_bytes: u64,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_files: 10,
            max_file_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

/// Collects field errors while walking a request.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`ValidationError`].
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields: self.0 })
        }
    }
}

/// Check an intake request before anything is persisted.
pub fn validate_intake(
    request: &IntakeRequest,
    limits: &IntakeLimits,
) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::new();

    if request.user_id.trim().is_empty() {
        errors.push("user_id", "must not be empty");
    }

    if request.title.trim().is_empty() {
        errors.push("title", "must not be empty");
    }

    if request.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        errors.push(
            "description",
            format!("must be at least {MIN_DESCRIPTION_CHARS} characters"),
        );
    }

    if request.files.len() > limits.max_files {
        errors.push(
            "files",
            format!("at most {} files may be attached", limits.max_files),
        );
    }

    for (i, file) in request.files.iter().enumerate() {
        if file.file_name.trim().is_empty() {
            errors.push(format!("files[{i}].file_name"), "must not be empty");
        }
        if file.size() > limits.max_file_bytes {
            errors.push(
                format!("files[{i}]"),
                format!(
                    "{} bytes exceeds limit of {} bytes",
                    file.size(),
                    limits.max_file_bytes
                ),
            );
        }
    }

    errors.into_result()
}
