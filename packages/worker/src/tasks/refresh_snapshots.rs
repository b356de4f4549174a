use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

/// Copies the live counters into their snapshot siblings, zeroing every
/// trending delta until new activity arrives.
///
/// A single UPDATE so each row's three snapshots always move together.
pub async fn refresh_snapshots(pool: &PgPool) -> Result<()> {
    info!("Starting snapshot refresh...");

    let result = sqlx::query(
        r#"
        UPDATE skills
        SET view_count_snapshot = view_count,
            install_count_snapshot = install_count,
            good_count_snapshot = good_count
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to refresh counter snapshots")?;

    info!(
        "Snapshot refresh complete: {} skills checkpointed",
        result.rows_affected()
    );
    Ok(())
}
