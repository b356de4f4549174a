use crate::handlers::directory::ServiceError;
use crate::state::AppState;
use axum::{extract::State, Json};
use database::models::Category;
use database::repositories::CategoryRepository;
use serde::Serialize;

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ServiceError> {
    let categories = CategoryRepository::new(state.db.pool.clone())
        .list_all()
        .await
        .map_err(|e| ServiceError::DatabaseError(e.to_string()))?;

    Ok(Json(CategoriesResponse { categories }))
}
