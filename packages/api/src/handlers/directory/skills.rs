use crate::handlers::directory::ServiceError;
use crate::services::listing::{self, ListingQuery, SortKey};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use database::models::{InstallSource, Skill, VoteCounts, VoteType};
use database::repositories::{InstallRepository, SkillRepository};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub skills: Vec<Skill>,
    pub count: usize,
}

pub async fn list_skills(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ServiceError> {
    let repo = SkillRepository::new(state.db.pool.clone());
    let candidates = repo
        .list_candidates(params.category.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Listing query failed: {}", e);
            ServiceError::DatabaseError("Failed to load skills".to_string())
        })?;

    let query = ListingQuery {
        q: params.q.as_deref(),
        tag: params.tag.as_deref(),
        sort: SortKey::parse(params.sort.as_deref()),
        limit: params.limit.unwrap_or(listing::DEFAULT_LIMIT),
        offset: params.offset.unwrap_or(0),
        now: chrono::Utc::now(),
    };
    let skills = listing::build_page(candidates, &query);

    Ok(Json(ListResponse {
        count: skills.len(),
        skills,
    }))
}

#[derive(Serialize)]
pub struct SkillResponse {
    pub skill: Skill,
}

pub async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SkillResponse>, ServiceError> {
    let repo = SkillRepository::new(state.db.pool.clone());
    let skill = resolve_skill(&repo, &id).await?;

    // The response carries the pre-increment count; the bump lands for the
    // next reader.
    let pool = state.db.pool.clone();
    let skill_id = skill.id;
    tokio::spawn(async move {
        let repo = SkillRepository::new(pool);
        if let Err(e) = repo.increment_view_count(skill_id).await {
            tracing::warn!("Failed to count view for {}: {}", skill_id, e);
        }
    });

    Ok(Json(SkillResponse { skill }))
}

#[derive(Deserialize)]
pub struct VoteBody {
    pub vote_type: String,
    pub previous_vote: Option<String>,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<VoteBody>,
) -> Result<Json<VoteCounts>, ServiceError> {
    let vote = parse_vote(&body.vote_type)?;
    let previous = match body.previous_vote.as_deref() {
        Some(prev) => Some(parse_vote(prev)?),
        None => None,
    };

    let repo = SkillRepository::new(state.db.pool.clone());
    let skill = resolve_skill(&repo, &id).await?;

    let counts = repo
        .cast_vote(skill.id, vote, previous)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Skill not found".to_string()))?;

    Ok(Json(counts))
}

#[derive(Deserialize)]
pub struct RetractBody {
    pub vote_type: String,
}

pub async fn retract_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RetractBody>,
) -> Result<Json<VoteCounts>, ServiceError> {
    let vote = parse_vote(&body.vote_type)?;

    let repo = SkillRepository::new(state.db.pool.clone());
    let skill = resolve_skill(&repo, &id).await?;

    let counts = repo
        .retract_vote(skill.id, vote)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Skill not found".to_string()))?;

    Ok(Json(counts))
}

#[derive(Deserialize)]
pub struct InstallBody {
    pub source: Option<String>,
}

#[derive(Serialize)]
pub struct InstallResponse {
    pub success: bool,
    pub install_count: i64,
}

pub async fn record_install(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<InstallBody>,
) -> Result<Json<InstallResponse>, ServiceError> {
    let source = match body.source.as_deref() {
        Some(source) => source
            .parse::<InstallSource>()
            .map_err(|e| ServiceError::BadRequest(e.to_string()))?,
        None => InstallSource::default(),
    };

    let repo = SkillRepository::new(state.db.pool.clone());
    let skill = resolve_skill(&repo, &id).await?;

    let install_count = InstallRepository::new(state.db.pool.clone())
        .record(skill.id, source)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Skill not found".to_string()))?;

    Ok(Json(InstallResponse {
        success: true,
        install_count,
    }))
}

fn parse_vote(raw: &str) -> Result<VoteType, ServiceError> {
    raw.parse::<VoteType>()
        .map_err(|e| ServiceError::BadRequest(e.to_string()))
}

async fn resolve_skill(repo: &SkillRepository, key: &str) -> Result<Skill, ServiceError> {
    repo.find_by_id_or_slug(key)
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ServiceError::NotFound("Skill not found".to_string()))
}
