//! Classroom API Backend
//!
//! REST backend for the trivia, booking and coffee shop frontends, with SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod pagination;
mod quiz;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{JwtVerifier, PermissionVerifier};
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    /// `None` when no token secret is configured.
    pub verifier: Option<Arc<dyn PermissionVerifier>>,
}

impl AppState {
    pub fn new(repo: Repository, config: Config) -> Self {
        let verifier = config
            .auth
            .as_ref()
            .map(|auth| Arc::new(JwtVerifier::new(auth)) as Arc<dyn PermissionVerifier>);

        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            verifier,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Classroom API Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let bind_addr = config.bind_addr;

    // Create application state
    let state = AppState::new(Repository::new(pool), config);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Warn if no token secret is configured
    if state.config.auth.is_none() {
        if state.config.auth_disabled {
            tracing::warn!(
                "CLASSROOM_AUTH_DISABLED is set and no token secret is configured. Drink permissions are not enforced!"
            );
        } else {
            tracing::warn!(
                "No token secret configured (CLASSROOM_JWT_SECRET). Protected drink endpoints will refuse every request."
            );
        }
    }

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Trivia
    let trivia_routes = Router::new()
        .route("/categories", get(api::list_categories))
        .route("/categories/{id}/questions", get(api::category_questions))
        .route(
            "/questions",
            get(api::list_questions).post(api::post_questions),
        )
        .route("/questions/{id}", delete(api::delete_question))
        .route("/quizzes", post(api::play_quiz));

    // Booking
    let booking_routes = Router::new()
        .route("/venues", get(api::list_venues).post(api::create_venue))
        .route("/venues/search", post(api::search_venues))
        .route(
            "/venues/{id}",
            get(api::get_venue)
                .patch(api::update_venue)
                .delete(api::delete_venue),
        )
        .route("/artists", get(api::list_artists).post(api::create_artist))
        .route("/artists/search", post(api::search_artists))
        .route(
            "/artists/{id}",
            get(api::get_artist).patch(api::update_artist),
        )
        .route("/shows", get(api::list_shows).post(api::create_show));

    // Coffee shop
    let drink_routes = Router::new()
        .route("/drinks", get(api::list_drinks).post(api::create_drink))
        .route("/drinks-detail", get(api::drinks_detail))
        .route(
            "/drinks/{id}",
            patch(api::update_drink).delete(api::delete_drink),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(trivia_routes)
        .merge(booking_routes)
        .merge(drink_routes)
        .merge(health_routes)
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::method_not_allowed)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
