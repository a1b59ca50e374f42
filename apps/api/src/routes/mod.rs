pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Export API
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/export", post(handlers::handle_export))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
