use std::sync::Arc;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;
use crate::matching::job_matcher::JobMatcher;
use crate::matching::store::JobMatchStore;
use crate::resumes::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Heuristic or LLM, chosen at startup from ANALYSIS_BACKEND.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub job_matcher: Arc<dyn JobMatcher>,
    pub resumes: Arc<dyn ResumeStore>,
    pub match_store: Arc<dyn JobMatchStore>,
}
