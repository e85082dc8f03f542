pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tailoring::handlers;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route(
            "/api/upload-resume",
            post(handlers::handle_upload_resume),
        )
        .route(
            "/api/tailor-resume",
            post(handlers::handle_tailor_resume),
        )
        .route(
            "/api/download-resume/:id",
            get(handlers::handle_download_resume),
        )
        .route("/api/analyses", get(handlers::handle_list_analyses))
        .route("/api/analyses/:id", get(handlers::handle_get_analysis))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
