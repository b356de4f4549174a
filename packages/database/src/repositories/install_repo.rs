use crate::models::InstallSource;
use sqlx::{PgPool, Result};
use uuid::Uuid;

pub struct InstallRepository {
    pool: PgPool,
}

impl InstallRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one install event and bumps the live counter in the same
    /// transaction, so the event log and the counter never drift. Returns
    /// the new `install_count`, or `None` when the skill does not exist.
    pub async fn record(&self, skill_id: Uuid, source: InstallSource) -> Result<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE skills SET install_count = install_count + 1 WHERE id = $1 RETURNING install_count",
        )
        .bind(skill_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(install_count) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("INSERT INTO installs (skill_id, source) VALUES ($1, $2)")
            .bind(skill_id)
            .bind(source.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(install_count))
    }
}
