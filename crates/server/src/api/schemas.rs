use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lexcase_core::FieldError;
use lexcase_intake::IntakeMetricsSnapshot;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `"ok"` when every backend is reachable, `"degraded"` otherwise.
    #[schema(example = "ok")]
    pub status: String,
    /// Case repository reachability.
    #[schema(example = "ok")]
    pub repository: String,
    /// Object store reachability.
    #[schema(example = "ok")]
    pub storage: String,
    /// Current intake metrics snapshot.
    pub metrics: MetricsResponse,
}

/// Intake counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    /// Case submissions received.
    #[schema(example = 42)]
    pub submitted: u64,
    /// Submissions rejected by validation.
    #[schema(example = 3)]
    pub rejected: u64,
    /// Cases created.
    #[schema(example = 39)]
    pub cases_created: u64,
    /// Submissions that failed while creating the case.
    #[schema(example = 0)]
    pub case_failures: u64,
    /// Files uploaded and registered.
    #[schema(example = 57)]
    pub attachments_stored: u64,
    /// Files whose upload failed.
    #[schema(example = 1)]
    pub upload_failures: u64,
    /// Files uploaded but not registered.
    #[schema(example = 0)]
    pub registration_failures: u64,
}

impl From<IntakeMetricsSnapshot> for MetricsResponse {
    fn from(snap: IntakeMetricsSnapshot) -> Self {
        Self {
            submitted: snap.submitted,
            rejected: snap.rejected,
            cases_created: snap.cases_created,
            case_failures: snap.case_failures,
            attachments_stored: snap.attachments_stored,
            upload_failures: snap.upload_failures,
            registration_failures: snap.registration_failures,
        }
    }
}

/// Generic error response returned on failures.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    #[schema(example = "case not found: 01941f29-7c4a-7d3e-9b1a-5f0c2e8d4a11")]
    pub error: String,
}

/// Returned with `422` when a submission is rejected.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    #[schema(example = "validation failed")]
    pub error: String,
    /// Every invalid field with the reason it was rejected.
    pub fields: Vec<FieldError>,
}
