use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::schemas::{HealthResponse, MetricsResponse};

fn component_status<E: std::fmt::Display>(result: Result<(), E>) -> String {
    match result {
        Ok(()) => "ok".to_owned(),
        Err(e) => format!("error: {e}"),
    }
}

/// `GET /health` -- backend reachability together with a metrics snapshot.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    description = "Checks the case repository and object store and returns intake metrics.",
    responses(
        (status = 200, description = "All backends reachable", body = HealthResponse),
        (status = 503, description = "A backend is unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (repo, storage) = tokio::join!(
        state.repository.health_check(),
        state.storage.health_check()
    );
    let healthy = repo.is_ok() && storage.is_ok();

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_owned(),
        repository: component_status(repo),
        storage: component_status(storage),
        metrics: state.workflow.metrics().snapshot().into(),
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

/// `GET /metrics` -- intake counters as JSON.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    summary = "Intake metrics",
    description = "Returns current intake counters for monitoring.",
    responses(
        (status = 200, description = "Current metric counters", body = MetricsResponse)
    )
)]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = MetricsResponse::from(state.workflow.metrics().snapshot());
    (StatusCode::OK, Json(body))
}
