//! Xiangqi Server - HTTP API for the board front end
//!
//! This crate provides the web backend:
//! - Stateless AI endpoints (move, hint, evaluation) over a posted board
//! - Server-held game sessions with undo and AI replies
//! - Static file serving for the front end

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::{ServerState, DEFAULT_MAX_SESSIONS};

use xiangqi_core::SessionConfig;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Used by `POST /api/games` when the request has no body
    pub session_defaults: SessionConfig,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            static_dir: "static".to_string(),
            session_defaults: SessionConfig::default(),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoints
        .route("/health", get(routes::status::health_handler))
        .route("/api/status", get(routes::status::status_handler))
        // Stateless AI API
        .route("/api/ai_move", post(routes::ai::ai_move))
        .route("/api/hint", post(routes::ai::hint))
        .route("/api/evaluate", post(routes::ai::evaluate_position))
        // Game sessions
        .route("/api/games", post(routes::games::create_game))
        .route(
            "/api/games/:id",
            get(routes::games::get_game).delete(routes::games::delete_game),
        )
        .route("/api/games/:id/legal", get(routes::games::legal_moves))
        .route("/api/games/:id/move", post(routes::games::make_move))
        .route("/api/games/:id/ai-move", post(routes::games::ai_move))
        .route("/api/games/:id/undo", post(routes::games::undo))
        .route("/api/games/:id/new", post(routes::games::new_game))
        .route("/api/games/:id/hint", get(routes::games::hint))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive())
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::from_config(&config));
    let router = create_router(&config, state);

    tracing::info!("Xiangqi server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    tracing::info!(
        mode = ?config.session_defaults.mode,
        difficulty = %config.session_defaults.difficulty,
        max_sessions = config.max_sessions,
        "Session defaults"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
