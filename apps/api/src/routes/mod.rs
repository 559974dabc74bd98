pub mod health;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::plan::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML
        .route("/", get(pages::index))
        .route("/start", get(pages::intake_form))
        .route("/plan", get(pages::show_plan).post(pages::submit_form))
        // Plan API
        .route("/api/generate-plan", post(handlers::handle_generate_plan))
        .route("/api/plan/normalize", post(handlers::handle_normalize))
        .route("/api/plan/latest", get(handlers::handle_latest))
        .route(
            "/api/plan/latest/speech",
            get(handlers::handle_latest_speech),
        )
        .route(
            "/api/plan/latest/download",
            get(handlers::handle_latest_download),
        )
        .with_state(state)
}
