use crate::services::notify::AdminNotifier;
use database::Database;
use ranking::RateLimiter;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    /// Shared across handlers so every write endpoint draws from the same
    /// per-address budgets.
    pub limiter: Arc<RateLimiter>,
    pub notifier: Arc<AdminNotifier>,
}
