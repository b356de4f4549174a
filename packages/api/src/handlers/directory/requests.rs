use crate::handlers::directory::ServiceError;
use crate::state::AppState;
use axum::{extract::State, Json};
use database::models::SkillRequest;
use database::repositories::SkillRequestRepository;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

#[derive(Deserialize)]
pub struct SkillRequestBody {
    pub github_url: String,
    pub description: Option<String>,
}

/// Repository URLs only: `https://github.com/{owner}/{repo}` with an
/// optional trailing slash. No subpaths, no query strings.
fn github_repo_url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https://github\.com/[\w.-]+/[\w.-]+/?$").expect("valid regex"))
}

pub async fn create_skill_request(
    State(state): State<AppState>,
    Json(body): Json<SkillRequestBody>,
) -> Result<Json<SkillRequest>, ServiceError> {
    if !github_repo_url().is_match(&body.github_url) {
        return Err(ServiceError::BadRequest("Invalid GitHub URL".to_string()));
    }

    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let request = SkillRequestRepository::new(state.db.pool.clone())
        .create(&body.github_url, description)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

    tracing::info!("New skill request {} for {}", request.id, request.github_url);
    state.notifier.notify_new_request(&request);

    Ok(Json(request))
}
