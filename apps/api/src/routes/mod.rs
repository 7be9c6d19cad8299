pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::ranking::handlers;
use crate::state::AppState;

/// Builds the full router. CORS is open to any origin on every route.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Form UI
        .route(
            "/",
            get(handlers::handle_index).post(handlers::handle_form_submit),
        )
        // JSON API
        .route("/api/rank_resumes", post(handlers::handle_rank_api))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
