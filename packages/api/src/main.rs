use axum::extract::State;
use axum::{http, routing::get, Json, Router};
use database::Database;
use dotenv::dotenv;
use ranking::RateLimiter;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod middleware;
mod services;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load Config
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let cors_origin = std::env::var("CORS_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3001".to_string());
    let webhook_url = std::env::var("ADMIN_WEBHOOK_URL").ok();

    // Connect to Database
    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    // Create AppState
    let app_state = AppState {
        db: db.clone(),
        limiter: Arc::new(RateLimiter::new()),
        notifier: Arc::new(services::notify::AdminNotifier::new(webhook_url)),
    };

    // Setup CORS
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(cors_origin.parse::<http::HeaderValue>()?)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT]);

    // Setup Router using handlers
    let app = Router::new()
        .route("/health", get(health_check))
        .merge(handlers::directory::router())
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start Server
    let addr: SocketAddr = bind_addr.parse()?;
    tracing::info!("Directory API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            "unreachable"
        }
    };

    Json(json!({ "status": "ok", "database": database }))
}
