pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod repository;
pub mod routers;
pub mod state;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routers::{health_check_route, root_route, song_routes};
use state::AppState;

/// The full HTTP surface, ready to hand to `axum::serve`.
pub fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Core routes
        .route("/", get(root_route))
        .route("/health", get(health_check_route))
        .merge(song_routes())
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
