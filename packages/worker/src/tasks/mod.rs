pub mod refresh_snapshots;
