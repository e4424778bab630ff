use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the active analysis backends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer",
        "analyzer": state.analyzer.backend(),
        "job_matcher": state.job_matcher.backend(),
        "skill_match_mode": state.config.skill_match_mode.as_str()
    }))
}
