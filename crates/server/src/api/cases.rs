use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use lexcase_core::{
    Attachment, Case, CaseId, CaseStatus, FieldErrors, IntakeFile, IntakeLimits, IntakeRequest,
    UserId, ValidationError, validate_intake,
};

use super::AppState;
use super::schemas::{ErrorResponse, ValidationErrorResponse};
use crate::error::ServerError;

/// A file attached to a new case, carried inline as base64.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseFileUpload {
    /// Original filename.
    #[schema(example = "acta_matrimonio.pdf")]
    pub file_name: String,
    /// Declared MIME type.
    #[schema(example = "application/pdf")]
    pub mime_type: String,
    /// File content, standard base64 with padding.
    #[schema(example = "JVBERi0xLjQK")]
    pub data_base64: String,
}

/// Request body for opening a case.
///
/// Missing text fields deserialize as empty so that validation reports them
/// in the usual `fields` list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCaseRequest {
    /// Owning user.
    #[serde(default)]
    #[schema(example = "u1")]
    pub user_id: String,
    /// Short summary of the matter.
    #[serde(default)]
    #[schema(example = "Divorcio")]
    pub title: String,
    /// Account of the situation, at least 10 characters.
    #[serde(default)]
    #[schema(example = "Necesito ayuda legal con mi divorcio")]
    pub description: String,
    /// Supporting documents.
    #[serde(default)]
    pub files: Vec<CaseFileUpload>,
}

impl CreateCaseRequest {
    /// Decode the file bodies into an [`IntakeRequest`].
    ///
    /// Undecodable files are reported as `files[i]` field errors alongside
    /// any other validation failure, so the caller sees every problem at once.
    pub fn into_intake(self, limits: &IntakeLimits) -> Result<IntakeRequest, ValidationError> {
        let mut decode_errors = FieldErrors::new();

        let files = self
            .files
            .into_iter()
            .enumerate()
            .map(|(i, file)| {
                let data = STANDARD.decode(file.data_base64.as_bytes()).unwrap_or_else(|_| {
                    decode_errors.push(format!("files[{i}]"), "data_base64 is not valid base64");
                    Vec::new()
                });
                IntakeFile::new(file.file_name, file.mime_type, Bytes::from(data))
            })
            .collect();

        let request = IntakeRequest {
            user_id: UserId::new(self.user_id),
            title: self.title,
            description: self.description,
            files,
        };

        if decode_errors.is_empty() {
            return Ok(request);
        }
        if let Err(e) = validate_intake(&request, limits) {
            for field in e.fields {
                decode_errors.push(field.field, field.message);
            }
        }
        decode_errors.into_result().map(|()| request)
    }
}

/// Response body for a newly opened case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCaseResponse {
    /// Identifier of the created case.
    pub case_id: CaseId,
}

/// Request body for moving a case to another status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: CaseStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCasesResponse {
    /// Cases, newest first.
    pub cases: Vec<Case>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListAttachmentsResponse {
    /// Attachments, oldest first.
    pub attachments: Vec<Attachment>,
    pub count: usize,
}

/// `POST /v1/cases` -- open a case with its supporting files.
///
/// Files that fail to upload or register are logged and left out; the case
/// is still created and its id returned.
#[utoipa::path(
    post,
    path = "/v1/cases",
    tag = "Cases",
    summary = "Open a case",
    description = "Validates the submission, creates the case, then uploads and registers each file. Per-file failures do not fail the request.",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = CreateCaseResponse),
        (status = 422, description = "Submission rejected", body = ValidationErrorResponse),
        (status = 500, description = "Case could not be persisted", body = ErrorResponse)
    )
)]
pub async fn create_case(
    State(state): State<AppState>,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CreateCaseResponse>), ServerError> {
    let request = match body.into_intake(state.workflow.limits()) {
        Ok(request) => request,
        Err(e) => {
            state.workflow.reject(&e);
            return Err(e.into());
        }
    };
    let outcome = state.workflow.submit(request).await?;

    let case_id = outcome.case_id();
    if outcome.failed_count() > 0 {
        info!(
            case_id = %case_id,
            failed = outcome.failed_count(),
            "case created with skipped attachments"
        );
    }

    Ok((StatusCode::CREATED, Json(CreateCaseResponse { case_id })))
}

/// `GET /v1/cases/{id}` -- fetch a single case.
#[utoipa::path(
    get,
    path = "/v1/cases/{id}",
    tag = "Cases",
    summary = "Get case",
    params(("id" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Case found", body = Case),
        (status = 404, description = "Case not found", body = ErrorResponse)
    )
)]
pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<CaseId>,
) -> Result<Json<Case>, ServerError> {
    state
        .repository
        .get_case(id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("case not found: {id}")))
}

/// `GET /v1/cases/{id}/attachments` -- list the files registered for a case.
#[utoipa::path(
    get,
    path = "/v1/cases/{id}/attachments",
    tag = "Cases",
    summary = "List case attachments",
    params(("id" = String, Path, description = "Case ID")),
    responses(
        (status = 200, description = "Attachments, oldest first", body = ListAttachmentsResponse),
        (status = 404, description = "Case not found", body = ErrorResponse)
    )
)]
pub async fn list_attachments(
    State(state): State<AppState>,
    Path(id): Path<CaseId>,
) -> Result<Json<ListAttachmentsResponse>, ServerError> {
    if state.repository.get_case(id).await?.is_none() {
        return Err(ServerError::NotFound(format!("case not found: {id}")));
    }

    let attachments = state.repository.list_attachments(id).await?;
    Ok(Json(ListAttachmentsResponse {
        count: attachments.len(),
        attachments,
    }))
}

/// `GET /v1/users/{user_id}/cases` -- list a user's cases.
#[utoipa::path(
    get,
    path = "/v1/users/{user_id}/cases",
    tag = "Cases",
    summary = "List user cases",
    params(("user_id" = String, Path, description = "Owning user ID")),
    responses(
        (status = 200, description = "Cases, newest first", body = ListCasesResponse)
    )
)]
pub async fn list_user_cases(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ListCasesResponse>, ServerError> {
    let cases = state.repository.list_cases(&UserId::new(user_id)).await?;
    Ok(Json(ListCasesResponse {
        count: cases.len(),
        cases,
    }))
}

/// `PUT /v1/cases/{id}/status` -- move a case to another status.
#[utoipa::path(
    put,
    path = "/v1/cases/{id}/status",
    tag = "Cases",
    summary = "Update case status",
    params(("id" = String, Path, description = "Case ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated case", body = Case),
        (status = 404, description = "Case not found", body = ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<CaseId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Case>, ServerError> {
    let case = state.repository.update_status(id, body.status).await?;
    info!(case_id = %id, status = %case.status, "case status updated");
    Ok(Json(case))
}
