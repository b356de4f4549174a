use crate::handlers::directory::ServiceError;
use crate::services::listing;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use database::models::Skill;
use database::repositories::SkillRepository;
use serde::{Deserialize, Serialize};

/// Quality bar for the "new" tab; fresh entries without traction stay out.
const NEW_TAB_MIN_STARS: i64 = 50;
const DISCOVER_PAGE_SIZE: i64 = 30;

#[derive(Deserialize)]
pub struct DiscoverParams {
    pub tab: Option<String>,
}

#[derive(Serialize)]
pub struct DiscoverResponse {
    pub tab: &'static str,
    pub skills: Vec<Skill>,
}

pub async fn discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<DiscoverResponse>, ServiceError> {
    let repo = SkillRepository::new(state.db.pool.clone());

    // Anything other than "new" lands on trending.
    if params.tab.as_deref().unwrap_or("new") == "new" {
        let skills = repo
            .list_new(NEW_TAB_MIN_STARS, DISCOVER_PAGE_SIZE)
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;
        return Ok(Json(DiscoverResponse { tab: "new", skills }));
    }

    let candidates = repo
        .list_candidates(None)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;
    let skills = listing::top_trending(
        candidates,
        DISCOVER_PAGE_SIZE as usize,
        chrono::Utc::now(),
    );

    Ok(Json(DiscoverResponse {
        tab: "trending",
        skills,
    }))
}
