use database::Database;
use dotenv::dotenv;
use std::time::Duration;
use tokio::time::sleep;

mod tasks;

/// Weekly by default; the directory's counters move slowly enough that a
/// tighter cadence would only erase trending deltas faster.
const DEFAULT_INTERVAL_HOURS: u64 = 168;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("Snapshot worker starting...");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let interval_hours = std::env::var("SNAPSHOT_INTERVAL_HOURS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_INTERVAL_HOURS);

    // Connect to shared database
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    tracing::info!(
        "Connected to database. Refreshing snapshots every {}h",
        interval_hours
    );

    // First refresh runs immediately so a fresh deployment starts with
    // current checkpoints instead of week-old zeros.
    loop {
        if let Err(e) = tasks::refresh_snapshots::refresh_snapshots(&db.pool).await {
            tracing::error!("Snapshot refresh failed: {:#}", e);
        }

        sleep(Duration::from_secs(interval_hours * 60 * 60)).await;
    }
}
