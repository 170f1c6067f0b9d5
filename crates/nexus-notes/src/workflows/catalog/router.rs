use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{NoteDraft, NoteId};
use super::facets::FacetSelection;
use super::repository::{FileStore, NoteRepository, RepositoryError};
use super::search::NoteQuery;
use super::service::{CatalogServiceError, NoteCatalogService, MAX_UPLOAD_BYTES};

/// Header carrying the authenticated user's id, set by the auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the original name of an uploaded attachment.
pub const FILE_NAME_HEADER: &str = "x-file-name";

/// Router builder exposing browse, editor and moderation endpoints.
pub fn catalog_router<R, F>(service: Arc<NoteCatalogService<R, F>>) -> Router
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/notes",
            get(list_handler::<R, F>).post(save_handler::<R, F>),
        )
        .route("/api/v1/notes/facets", get(facets_handler::<R, F>))
        .route("/api/v1/notes/stats", get(stats_handler::<R, F>))
        .route(
            "/api/v1/authors/:author/profile",
            get(profile_handler::<R, F>),
        )
        .route(
            "/api/v1/notes/files",
            post(upload_handler::<R, F>).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/v1/notes/:note_id",
            get(note_handler::<R, F>).delete(delete_handler::<R, F>),
        )
        .route(
            "/api/v1/notes/:note_id/verification",
            put(verification_handler::<R, F>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsParams {
    #[serde(default)]
    author: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerificationRequest {
    verified: bool,
}

pub(crate) async fn list_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Query(query): Query<NoteQuery>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let notes = service.search(&query).await;
    (StatusCode::OK, Json(notes)).into_response()
}

pub(crate) async fn facets_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Query(selection): Query<FacetSelection>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let candidates = service.facets(&selection).await;
    (StatusCode::OK, Json(candidates)).into_response()
}

pub(crate) async fn stats_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Query(params): Query<StatsParams>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let stats = service.stats(params.author.as_deref()).await;
    (StatusCode::OK, Json(stats)).into_response()
}

pub(crate) async fn profile_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Path(author): Path<String>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let profile = service.profile(&author).await;
    (StatusCode::OK, Json(profile)).into_response()
}

pub(crate) async fn note_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Path(note_id): Path<String>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    match service.get(&NoteId(note_id.clone())).await {
        Some(note) => (StatusCode::OK, Json(note)).into_response(),
        None => {
            let payload = json!({
                "error": "note not found",
                "note_id": note_id,
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn save_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    headers: HeaderMap,
    Json(draft): Json<NoteDraft>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let created = draft.is_new();
    match service.save(draft, user_id).await {
        Ok(outcome) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(outcome)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Path(note_id): Path<String>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    match service.delete(&NoteId(note_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verification_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    Path(note_id): Path<String>,
    Json(request): Json<VerificationRequest>,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    match service
        .set_verified(&NoteId(note_id), request.verified)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_handler<R, F>(
    State(service): State<Arc<NoteCatalogService<R, F>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: NoteRepository + 'static,
    F: FileStore + 'static,
{
    let file_name = headers
        .get(FILE_NAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match service.upload(file_name, body.to_vec(), content_type).await {
        Ok(upload) => (StatusCode::CREATED, Json(upload)).into_response(),
        Err(error) => error_response(error),
    }
}

impl CatalogServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogServiceError::Validation(_) | CatalogServiceError::MissingFileName => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CatalogServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            CatalogServiceError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CatalogServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            CatalogServiceError::Repository(RepositoryError::Rejected { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            CatalogServiceError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

fn error_response(error: CatalogServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (error.status(), Json(payload)).into_response()
}
