pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::store::MasteryStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MasteryStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn MasteryStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let store = store::open(&config).await?;
    tracing::info!(backend = store.backend(), "Store ready");

    let addr = config.bind_addr();
    let app = build_router(AppState::new(store, config));

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full router around an already opened store.
pub fn build_router(state: AppState) -> Router {
    // Everything under /api requires an X-User-Id header
    let protected_routes = Router::new()
        // Question routes
        .route(
            "/api/questions",
            get(routes::questions::list).post(routes::questions::create),
        )
        // Practice routes
        .route("/api/practice/review", post(routes::practice::review))
        .route("/api/practice/session", post(routes::practice::session))
        // Mastery routes
        .route("/api/mastery", get(routes::mastery::list))
        .route("/api/mastery/stats", get(routes::mastery::stats))
        .route("/api/mastery/:question_id", get(routes::mastery::badge))
        // Settings routes
        .route(
            "/api/settings/study",
            get(routes::settings::get_study).put(routes::settings::update_study),
        )
        .layer(middleware::from_fn(routes::auth::auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
