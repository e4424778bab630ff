mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::{HeuristicAnalyzer, LlmAnalyzer, ResumeAnalyzer};
use crate::analysis::matcher::KeywordMatcher;
use crate::config::{AnalysisBackend, Config};
use crate::db::create_pool;
use crate::llm_client::{LlmClient, LlmProvider};
use crate::matching::job_matcher::{HeuristicJobMatcher, JobMatcher, LlmJobMatcher};
use crate::matching::store::PgJobMatchStore;
use crate::resumes::store::PgResumeStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let (analyzer, job_matcher) = build_backends(&config)?;
    info!(
        analyzer = analyzer.backend(),
        job_matcher = job_matcher.backend(),
        skill_match_mode = config.skill_match_mode.as_str(),
        "Analysis backends selected"
    );

    let resumes = Arc::new(PgResumeStore::new(db.clone()));
    let match_store = Arc::new(PgJobMatchStore::new(db));

    let state = AppState {
        config: config.clone(),
        analyzer,
        job_matcher,
        resumes,
        match_store,
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the analyzer/matcher pair. `auto` uses the LLM only with a usable
/// key; `llm` refuses to start without one.
fn build_backends(config: &Config) -> Result<(Arc<dyn ResumeAnalyzer>, Arc<dyn JobMatcher>)> {
    let matcher = KeywordMatcher::new(config.skill_match_mode);
    let heuristic = || -> (Arc<dyn ResumeAnalyzer>, Arc<dyn JobMatcher>) {
        let analyzer: Arc<dyn ResumeAnalyzer> = Arc::new(HeuristicAnalyzer::new(matcher));
        let job_matcher: Arc<dyn JobMatcher> = Arc::new(HeuristicJobMatcher::new(matcher));
        (analyzer, job_matcher)
    };

    let api_key = config.usable_api_key();
    match (config.analysis_backend, api_key) {
        (AnalysisBackend::Heuristic, _) => Ok(heuristic()),
        (AnalysisBackend::Llm, None) => {
            bail!("ANALYSIS_BACKEND=llm requires a valid OPENAI_API_KEY")
        }
        (AnalysisBackend::Auto, None) => {
            warn!("OPENAI_API_KEY missing or invalid; using heuristic analysis");
            Ok(heuristic())
        }
        (AnalysisBackend::Llm | AnalysisBackend::Auto, Some(key)) => {
            let llm: Arc<dyn LlmProvider> = Arc::new(LlmClient::new(
                key.to_string(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )?);
            info!("LLM client initialized (model: {})", llm.model());
            let analyzer: Arc<dyn ResumeAnalyzer> = Arc::new(LlmAnalyzer::new(llm.clone()));
            let job_matcher: Arc<dyn JobMatcher> = Arc::new(LlmJobMatcher::new(llm));
            Ok((analyzer, job_matcher))
        }
    }
}
