use crate::models::SkillRequest;
use sqlx::{PgPool, Result};

pub struct SkillRequestRepository {
    pool: PgPool,
}

impl SkillRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        github_url: &str,
        description: Option<&str>,
    ) -> Result<SkillRequest> {
        sqlx::query_as::<_, SkillRequest>(
            r#"
            INSERT INTO skill_requests (github_url, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(github_url)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }
}
