use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

pub use sqlx; // Re-exported so binaries share one sqlx version
pub mod models;
pub mod repositories;

#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Opens the Postgres pool, sized for a small directory service.
    pub async fn connect(database_url: &str) -> Result<Arc<Self>> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2) // Keep a couple of warm connections
            .acquire_timeout(Duration::from_secs(3)) // Fail fast when the pool is starved
            .idle_timeout(Duration::from_secs(60 * 5))
            .test_before_acquire(true) // Ping before handing out a connection
            .connect(database_url)
            .await
            .context("Failed to connect to the database")?;

        Ok(Arc::new(Self { pool }))
    }

    /// Applies pending migrations. Safe to call from every starting binary;
    /// concurrent runners serialize on the Postgres advisory lock.
    pub async fn migrate(&self) -> Result<()> {
        // Migration files are embedded into the binary at compile time
        sqlx::migrate!("src/migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(())
    }

    /// Liveness probe used by the API's /health endpoint.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}
