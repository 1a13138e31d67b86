pub mod cases;
pub mod health;
pub mod openapi;
pub mod schemas;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use lexcase_intake::IntakeWorkflow;
use lexcase_repo::CaseRepository;
use lexcase_storage::ObjectStore;

use self::openapi::ApiDoc;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Intake workflow used by `POST /v1/cases`.
    pub workflow: Arc<IntakeWorkflow>,
    /// Repository for read-side endpoints. Same instance the workflow writes to.
    pub repository: Arc<dyn CaseRepository>,
    /// Object store, used for health checks.
    pub storage: Arc<dyn ObjectStore>,
    /// Maximum accepted request body size in bytes.
    pub body_limit: usize,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let body_limit = state.body_limit;

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .route("/v1/cases", post(cases::create_case))
        .route("/v1/cases/{id}", get(cases::get_case))
        .route("/v1/cases/{id}/attachments", get(cases::list_attachments))
        .route("/v1/cases/{id}/status", put(cases::update_status))
        .route("/v1/users/{user_id}/cases", get(cases::list_user_cases))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
