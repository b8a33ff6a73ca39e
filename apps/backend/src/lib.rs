pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub default_user_id: String,
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to database
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    // Bootstrap the default demo user so unauthenticated requests work
    let default_user_id =
        std::env::var("DEFAULT_USER_ID").unwrap_or_else(|_| "demo-user".to_string());
    let default_email =
        std::env::var("DEFAULT_USER_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let default_password =
        std::env::var("DEFAULT_USER_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    tracing::info!("Ensuring default user {}...", default_user_id);
    let password_hash = bcrypt::hash(&default_password, bcrypt::DEFAULT_COST)?;
    db.ensure_user(&default_user_id, &default_email, &password_hash, Some("Demo User"))
        .await?;

    let state = AppState {
        db: Arc::new(db),
        default_user_id,
    };

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full router. Exposed so integration tests can mount the same
/// routes without binding a listener.
pub fn build_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Session routes
        .route("/api/v1/sessions", post(routes::sessions::create))
        .route("/api/v1/sessions/recent", get(routes::sessions::recent))
        .route("/api/v1/sessions/:session_id", get(routes::sessions::get_one))
        .route("/api/v1/sessions/:session_id", put(routes::sessions::update))
        .route("/api/v1/sessions/:session_id", delete(routes::sessions::remove))
        // Dashboard routes
        .route("/api/v1/dashboard/today", get(routes::dashboard::today))
        .route("/api/v1/dashboard/weekly", get(routes::dashboard::weekly))
        .route("/api/v1/dashboard/heatmap", get(routes::dashboard::heatmap))
        .route("/api/v1/dashboard/top-tags", get(routes::dashboard::top_tags))
        .route("/api/v1/dashboard/streak", get(routes::dashboard::streak))
        // Tag routes
        .route("/api/v1/tags", get(routes::tags::list))
        // Report routes
        .route("/api/v1/reports/daily", post(routes::reports::create_daily))
        .route("/api/v1/reports/weekly", post(routes::reports::create_weekly))
        .route("/api/v1/reports", get(routes::reports::list))
        .route(
            "/api/v1/reports/:report_id/download",
            post(routes::reports::download),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::user_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/auth/signup", post(routes::auth::signup))
        .route("/api/v1/auth/login", post(routes::auth::login))
        .merge(protected_routes)
        .with_state(state)
}

async fn root() -> &'static str {
    "StudyLog backend is running"
}
