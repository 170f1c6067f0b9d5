use axum::{http::StatusCode, response::IntoResponse, response::Response, routing::post, Json, Router};
use serde::Deserialize;

use super::session::{AdmissionSession, SubjectInput};

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    #[serde(default)]
    subjects: Vec<SubjectInput>,
}

/// Stateless calculator endpoint.
pub fn admissions_router() -> Router {
    Router::new().route("/api/v1/admissions/score", post(score_handler))
}

pub(crate) async fn score_handler(Json(request): Json<ScoreRequest>) -> Response {
    let session = AdmissionSession::from_inputs(request.subjects);
    (StatusCode::OK, Json(session.breakdown())).into_response()
}
