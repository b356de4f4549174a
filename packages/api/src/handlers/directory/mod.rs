use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

pub mod categories;
pub mod discover;
pub mod requests;
pub mod skills;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/skills", get(skills::list_skills))
        .route("/v1/skills/:id", get(skills::get_skill))
        .route(
            "/v1/skills/:id/vote",
            post(skills::cast_vote).delete(skills::retract_vote),
        )
        .route("/v1/skills/:id/install", post(skills::record_install))
        .route("/v1/discover", get(discover::discover))
        .route("/v1/categories", get(categories::list_categories))
        .route("/v1/skill-requests", post(requests::create_skill_request))
}

pub enum ServiceError {
    DatabaseError(String),
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ServiceError::DatabaseError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e),
            ServiceError::BadRequest(e) => (StatusCode::BAD_REQUEST, e),
            ServiceError::NotFound(e) => (StatusCode::NOT_FOUND, e),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}
