#![allow(clippy::needless_for_each)]

use lexcase_core::{Attachment, Case, CaseId, CaseStatus, FieldError};

use super::cases::{
    CaseFileUpload, CreateCaseRequest, CreateCaseResponse, ListAttachmentsResponse,
    ListCasesResponse, UpdateStatusRequest,
};
use super::schemas::{ErrorResponse, HealthResponse, MetricsResponse, ValidationErrorResponse};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Lexcase API",
        version = "0.1.0",
        description = "HTTP API for opening legal-assistance cases and attaching supporting documents.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health and metrics"),
        (name = "Cases", description = "Case intake and lookup")
    ),
    paths(
        super::health::health,
        super::health::metrics,
        super::cases::create_case,
        super::cases::get_case,
        super::cases::list_attachments,
        super::cases::list_user_cases,
        super::cases::update_status,
    ),
    components(schemas(
        Case,
        CaseId,
        CaseStatus,
        Attachment,
        FieldError,
        CaseFileUpload,
        CreateCaseRequest,
        CreateCaseResponse,
        UpdateStatusRequest,
        ListCasesResponse,
        ListAttachmentsResponse,
        HealthResponse,
        MetricsResponse,
        ErrorResponse,
        ValidationErrorResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn document_lists_case_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/cases"));
        assert!(doc.paths.paths.contains_key("/v1/cases/{id}/attachments"));
        assert!(doc.paths.paths.contains_key("/v1/users/{user_id}/cases"));
    }
}
