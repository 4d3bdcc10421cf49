use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CaseAttributes, CaseId, CaseSnapshot, DocumentRecord};
use super::repository::{CaseSnapshotRepository, RepositoryError};
use super::service::{ChecklistService, ChecklistServiceError};
use crate::workflows::stage::{map_stage, StageProgressView};

/// Router builder exposing checklist and workflow stage endpoints.
pub fn checklist_router<R>(service: Arc<ChecklistService<R>>) -> Router
where
    R: CaseSnapshotRepository + 'static,
{
    Router::new()
        .route("/api/v1/checklist", post(evaluate_handler::<R>))
        .route("/api/v1/cases/:case_id", put(upsert_handler::<R>))
        .route("/api/v1/cases/:case_id/checklist", get(checklist_handler::<R>))
        .route("/api/v1/workflow/stages/:raw_stage", get(stage_handler))
        .with_state(service)
}

/// Body of a case upsert; the case id comes from the path.
#[derive(Debug, Deserialize)]
pub struct CaseSnapshotPayload {
    pub attributes: CaseAttributes,
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    #[serde(default)]
    pub raw_stage: Option<String>,
}

pub(crate) async fn evaluate_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    axum::Json(snapshot): axum::Json<CaseSnapshot>,
) -> Response
where
    R: CaseSnapshotRepository + 'static,
{
    let view = service.evaluate(&snapshot);
    (StatusCode::OK, axum::Json(view)).into_response()
}

pub(crate) async fn upsert_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path(case_id): Path<String>,
    axum::Json(payload): axum::Json<CaseSnapshotPayload>,
) -> Response
where
    R: CaseSnapshotRepository + 'static,
{
    let snapshot = CaseSnapshot {
        case_id: CaseId(case_id),
        attributes: payload.attributes,
        documents: payload.documents,
        raw_stage: payload.raw_stage,
    };
    match service.upsert(snapshot) {
        Ok((replaced, view)) => {
            let status = if replaced {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseSnapshotRepository + 'static,
{
    let id = CaseId(case_id);
    match service.checklist(&id) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(ChecklistServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "case_id": id.0,
                "error": "case not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn stage_handler(
    Path(raw_stage): Path<String>,
) -> axum::Json<StageProgressView> {
    axum::Json(map_stage(&raw_stage).progress_view())
}

fn error_response(error: ChecklistServiceError) -> Response {
    let status = match &error {
        ChecklistServiceError::InvalidSnapshot(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ChecklistServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ChecklistServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
