use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::model::{ChatTurn, GenerativeModel};
use super::prompts::StudyNote;
use super::service::{AssistantError, StudyAssistant};
use crate::workflows::admissions::{AdmissionSession, SubjectInput};

pub fn assistant_router<M>(assistant: Arc<StudyAssistant<M>>) -> Router
where
    M: GenerativeModel + 'static,
{
    Router::new()
        .route("/api/v1/assistant/summary", post(summary_handler::<M>))
        .route("/api/v1/assistant/chat", post(chat_handler::<M>))
        .route("/api/v1/assistant/study-guide", post(study_guide_handler::<M>))
        .route(
            "/api/v1/assistant/career-advice",
            post(career_advice_handler::<M>),
        )
        .with_state(assistant)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    message: String,
    #[serde(default)]
    history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudyGuideRequest {
    #[serde(default)]
    notes: Vec<StudyNote>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CareerAdviceRequest {
    #[serde(default)]
    subjects: Vec<SubjectInput>,
}

pub(crate) async fn summary_handler<M>(
    State(assistant): State<Arc<StudyAssistant<M>>>,
    Json(request): Json<SummaryRequest>,
) -> Response
where
    M: GenerativeModel + 'static,
{
    let reply = assistant
        .summarize_note(&request.title, &request.content)
        .await;
    (StatusCode::OK, Json(reply)).into_response()
}

pub(crate) async fn chat_handler<M>(
    State(assistant): State<Arc<StudyAssistant<M>>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    M: GenerativeModel + 'static,
{
    match assistant.chat(&request.message, &request.history).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn study_guide_handler<M>(
    State(assistant): State<Arc<StudyAssistant<M>>>,
    Json(request): Json<StudyGuideRequest>,
) -> Response
where
    M: GenerativeModel + 'static,
{
    let reply = assistant.study_guide(&request.notes).await;
    (StatusCode::OK, Json(reply)).into_response()
}

pub(crate) async fn career_advice_handler<M>(
    State(assistant): State<Arc<StudyAssistant<M>>>,
    Json(request): Json<CareerAdviceRequest>,
) -> Response
where
    M: GenerativeModel + 'static,
{
    let session = AdmissionSession::from_inputs(request.subjects);
    match assistant.consult(&session).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssistantError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
