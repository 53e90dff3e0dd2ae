pub mod health;

use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};

use crate::analysis::handlers as analysis;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Student flow
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .route("/api/v1/skill-gap", post(analysis::handle_skill_gap))
        .route("/api/v1/interview-prep", post(analysis::handle_interview_prep))
        .route("/api/v1/portfolio", post(analysis::handle_portfolio))
        .route("/api/v1/career-path", post(analysis::handle_career_path))
        // Industry flow
        .route("/api/v1/screening", post(screening::handle_screening))
        .route("/api/v1/screening/export", post(screening::handle_export))
        .layer(body_limit)
        .with_state(state)
}
