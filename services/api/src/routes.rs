use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use kyc_casework::workflows::checklist::{
    checklist_router, CaseSnapshotRepository, ChecklistService, DocumentRequirement,
    RequirementCatalog,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct CatalogListing {
    pub(crate) entity_types: Vec<EntityRequirements>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EntityRequirements {
    pub(crate) entity_type: String,
    pub(crate) requirements: Vec<DocumentRequirement>,
}

impl CatalogListing {
    pub(crate) fn from_catalog(catalog: &RequirementCatalog) -> Self {
        let entity_types = catalog
            .entity_types()
            .map(|entity_type| EntityRequirements {
                entity_type: entity_type.to_string(),
                requirements: catalog
                    .requirements_for(entity_type)
                    .map(<[DocumentRequirement]>::to_vec)
                    .unwrap_or_default(),
            })
            .collect();
        Self { entity_types }
    }
}

pub(crate) fn with_checklist_routes<R>(service: Arc<ChecklistService<R>>) -> axum::Router
where
    R: CaseSnapshotRepository + 'static,
{
    checklist_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/catalog", get(catalog_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let (status, label) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    };

    (status, Json(json!({ "status": label })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn catalog_endpoint(Extension(state): Extension<AppState>) -> Json<CatalogListing> {
    Json(CatalogListing::from_catalog(&state.catalog))
}
