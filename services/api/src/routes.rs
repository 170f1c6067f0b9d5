use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use nexus_notes::error::AppError;
use nexus_notes::workflows::admissions::admissions_router;
use nexus_notes::workflows::assistant::{
    assistant_router, AssistantReply, GenerativeModel, StudyAssistant,
};
use nexus_notes::workflows::catalog::{
    catalog_router, CatalogStats, FacetCandidates, FacetSelection, FileStore, NoteCsvImporter,
    NoteCatalogService, NoteRepository,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ImportPreviewRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) university: Option<String>,
    #[serde(default)]
    pub(crate) faculty: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportPreviewResponse {
    pub(crate) notes: usize,
    pub(crate) facets: FacetCandidates,
    pub(crate) stats: CatalogStats,
}

pub(crate) fn with_api_routes<R, F, M>(
    catalog: Arc<NoteCatalogService<R, F>>,
    assistant: Arc<StudyAssistant<M>>,
) -> axum::Router
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
    M: GenerativeModel + 'static,
{
    let study_guide = {
        let catalog = catalog.clone();
        let assistant = assistant.clone();
        move || catalog_study_guide_endpoint(catalog, assistant)
    };

    catalog_router(catalog)
        .merge(admissions_router())
        .merge(assistant_router(assistant))
        .route(
            "/api/v1/notes/study-guide",
            axum::routing::post(study_guide),
        )
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/notes/import/preview",
            axum::routing::post(import_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Study guide over the newest catalog notes; `422` when the catalog is empty.
pub(crate) async fn catalog_study_guide_endpoint<R, F, M>(
    catalog: Arc<NoteCatalogService<R, F>>,
    assistant: Arc<StudyAssistant<M>>,
) -> Result<Json<AssistantReply>, AppError>
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
    M: GenerativeModel + 'static,
{
    let notes = catalog.list().await;
    let reply = assistant.catalog_study_guide(&notes).await?;
    Ok(Json(reply))
}

/// Facets and statistics for a note export, without touching the catalog.
pub(crate) async fn import_preview_endpoint(
    Json(payload): Json<ImportPreviewRequest>,
) -> Result<Json<ImportPreviewResponse>, AppError> {
    let ImportPreviewRequest {
        csv,
        university,
        faculty,
    } = payload;

    let notes = NoteCsvImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let selection = FacetSelection::new(university.as_deref(), faculty.as_deref(), None);

    Ok(Json(ImportPreviewResponse {
        notes: notes.len(),
        facets: FacetCandidates::derive(&notes, &selection),
        stats: CatalogStats::from_notes(&notes, None),
    }))
}
