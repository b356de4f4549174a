use crate::models::Category;
use sqlx::{PgPool, Result};

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY sort_order, id")
            .fetch_all(&self.pool)
            .await
    }
}
