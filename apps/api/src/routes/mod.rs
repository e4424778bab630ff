pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/:id", delete(resumes::handle_delete_resume))
        .route(
            "/api/v1/resumes/:id/analyze",
            post(resumes::handle_analyze_resume),
        )
        .route(
            "/api/v1/resumes/:id/analysis",
            get(resumes::handle_get_analysis),
        )
        // Job matching API
        .route(
            "/api/v1/resumes/:id/job-matches",
            post(matching::handle_create_job_match).get(matching::handle_list_job_matches),
        )
        .with_state(state)
}
