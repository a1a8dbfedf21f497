use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::service::{AssessmentService, AssessmentServiceError, IngestRequest};
use super::session::{AnswerMutation, ViewToggle};
use super::store::SnapshotStore;

/// Body of an answers request: one or more edits applied in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswersRequest {
    pub mutations: Vec<AnswerMutation>,
}

/// Router builder exposing the audit session endpoints.
pub fn assessment_router<S>(service: Arc<AssessmentService<S>>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route("/api/v1/audits", post(ingest_handler::<S>))
        .route("/api/v1/audits/:audit_id", get(outputs_handler::<S>))
        .route(
            "/api/v1/audits/:audit_id/categories",
            get(categories_handler::<S>),
        )
        .route("/api/v1/audits/:audit_id/answers", post(answers_handler::<S>))
        .route("/api/v1/audits/:audit_id/flush", post(flush_handler::<S>))
        .route("/api/v1/audits/:audit_id/view", post(view_handler::<S>))
        .with_state(service)
}

pub(crate) async fn ingest_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    axum::Json(request): axum::Json<IngestRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.ingest(request) {
        Ok(outputs) => (StatusCode::CREATED, axum::Json(outputs)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn outputs_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.outputs(&audit_id) {
        Ok(outputs) => (StatusCode::OK, axum::Json(outputs)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn categories_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.categories(&audit_id) {
        Ok(categories) => (StatusCode::OK, axum::Json(categories)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn answers_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(audit_id): Path<String>,
    axum::Json(request): axum::Json<AnswersRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.apply(&audit_id, &request.mutations) {
        Ok(applied) => (StatusCode::OK, axum::Json(applied)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn flush_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(audit_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.flush_changes(&audit_id) {
        Ok(changes) => (StatusCode::OK, axum::Json(changes)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn view_handler<S>(
    State(service): State<Arc<AssessmentService<S>>>,
    Path(audit_id): Path<String>,
    axum::Json(toggle): axum::Json<ViewToggle>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.toggle(&audit_id, &toggle) {
        Ok(categories) => (StatusCode::OK, axum::Json(categories)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::UnknownAudit(_) => StatusCode::NOT_FOUND,
        AssessmentServiceError::MissingAudit => StatusCode::BAD_REQUEST,
        AssessmentServiceError::Store(_) | AssessmentServiceError::SessionLock => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
