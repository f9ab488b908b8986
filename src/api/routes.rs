//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/init", post(handlers::init_index))
        .route("/search", post(handlers::search_places))
        .route("/chat", post(handlers::chat))
        .route("/weather", get(handlers::weather))
        .with_state(state)
}
