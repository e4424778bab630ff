use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::analysis::matcher::MatchMode;
use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Which analyzer/matcher pair the service runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisBackend {
    /// LLM when a usable API key is configured, heuristic otherwise.
    #[default]
    Auto,
    Llm,
    Heuristic,
}

impl FromStr for AnalysisBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(AnalysisBackend::Auto),
            "llm" => Ok(AnalysisBackend::Llm),
            "heuristic" => Ok(AnalysisBackend::Heuristic),
            other => Err(anyhow!(
                "unknown analysis backend '{other}' (expected 'auto', 'llm' or 'heuristic')"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub analysis_backend: AnalysisBackend,
    pub skill_match_mode: MatchMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            openai_model: env_or("OPENAI_MODEL", DEFAULT_MODEL),
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            analysis_backend: env_or("ANALYSIS_BACKEND", "auto")
                .parse::<AnalysisBackend>()
                .context("ANALYSIS_BACKEND is invalid")?,
            skill_match_mode: env_or("SKILL_MATCH_MODE", "word_boundary")
                .parse::<MatchMode>()
                .map_err(|e| anyhow!(e))
                .context("SKILL_MATCH_MODE is invalid")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// The API key, when it looks usable (`sk-` prefix, longer than 20 chars).
    pub fn usable_api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_usable_api_key(key))
    }
}

pub fn is_usable_api_key(key: &str) -> bool {
    key.starts_with("sk-") && key.len() > 20
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
