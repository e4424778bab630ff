//! Resume analyzers: pluggable backends behind one trait.
//!
//! `HeuristicAnalyzer` is deterministic and needs no network. `LlmAnalyzer`
//! asks the chat model for the same record and runs the reply through the
//! shared validate-and-default pass. A malformed reply is an error, never a
//! silent switch to the heuristic path.
//!
//! `AppState` holds an `Arc<dyn ResumeAnalyzer>`, chosen at startup via config.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::analysis::assembler::assemble_heuristic;
use crate::analysis::matcher::KeywordMatcher;
use crate::analysis::normalize::{ensure_sufficient_content, normalize_text};
use crate::analysis::prompts::{
    build_resume_analysis_prompt, RESUME_ANALYSIS_MAX_TOKENS, RESUME_ANALYSIS_ROLE,
    RESUME_ANALYSIS_TEMPERATURE,
};
use crate::analysis::sanitize::{validate_analysis, AnalysisInput};
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::json_system_prompt;
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::analysis::{AnalysisMetadata, ResumeAnalysis};

pub const HEURISTIC_CONFIDENCE: f64 = 1.0;
pub const LLM_CONFIDENCE: f64 = 0.85;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    /// Analyzes already-normalized resume text.
    async fn analyze(&self, text: &str) -> Result<ResumeAnalysis, AnalysisError>;

    /// "heuristic" or the model name, recorded in the analysis metadata.
    fn backend(&self) -> &str;

    fn confidence(&self) -> f64;
}

/// Analysis plus the metadata stored next to it.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: ResumeAnalysis,
    pub metadata: AnalysisMetadata,
}

/// Normalizes `raw_text`, rejects short input, then delegates to `analyzer`.
pub async fn run_analysis(
    analyzer: &dyn ResumeAnalyzer,
    raw_text: &str,
) -> Result<AnalysisOutcome, AnalysisError> {
    let started = Instant::now();
    let text = normalize_text(raw_text);
    ensure_sufficient_content(&text)?;

    debug!(
        backend = analyzer.backend(),
        chars = text.chars().count(),
        "Running resume analysis"
    );
    let analysis = analyzer.analyze(&text).await?;

    let processing_time_ms = started.elapsed().as_millis() as u64;
    info!(
        backend = analyzer.backend(),
        overall_score = analysis.overall_score,
        ats_score = analysis.ats_score,
        processing_time_ms,
        "Resume analysis complete"
    );

    Ok(AnalysisOutcome {
        analysis,
        metadata: AnalysisMetadata {
            processing_time_ms,
            backend: analyzer.backend().to_string(),
            confidence: analyzer.confidence(),
        },
    })
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicAnalyzer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct HeuristicAnalyzer {
    matcher: KeywordMatcher,
}

impl HeuristicAnalyzer {
    pub fn new(matcher: KeywordMatcher) -> Self {
        Self { matcher }
    }
}

#[async_trait]
impl ResumeAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, text: &str) -> Result<ResumeAnalysis, AnalysisError> {
        let computed = assemble_heuristic(text, &self.matcher);
        validate_analysis(AnalysisInput::Heuristic { computed })
    }

    fn backend(&self) -> &str {
        "heuristic"
    }

    fn confidence(&self) -> f64 {
        HEURISTIC_CONFIDENCE
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmAnalyzer {
    llm: Arc<dyn LlmProvider>,
}

impl LlmAnalyzer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeAnalyzer for LlmAnalyzer {
    async fn analyze(&self, text: &str) -> Result<ResumeAnalysis, AnalysisError> {
        let system = json_system_prompt(RESUME_ANALYSIS_ROLE);
        let prompt = build_resume_analysis_prompt(text);
        let raw = self
            .llm
            .complete(CompletionRequest {
                system: &system,
                prompt: &prompt,
                temperature: RESUME_ANALYSIS_TEMPERATURE,
                max_tokens: RESUME_ANALYSIS_MAX_TOKENS,
            })
            .await?;

        debug!(model = self.llm.model(), reply_chars = raw.len(), "LLM analysis reply received");
        validate_analysis(AnalysisInput::Llm { raw })
    }

    fn backend(&self) -> &str {
        self.llm.model()
    }

    fn confidence(&self) -> f64 {
        LLM_CONFIDENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::ScriptedLlm;
    use crate::llm_client::LlmError;
    use crate::models::analysis::{ExperienceLevel, Proficiency, SkillCategory};

    const RESUME: &str = "Senior   engineer with 6 years of experience building react and node \
        services.\n\n Led a project team and increased throughput by 30%. Contact: me@mail.com";

    const GOOD_REPLY: &str = r#"Here you go:
    {
      "technicalSkills": [
        {"name": "React", "category": "Frontend", "proficiency": "Advanced", "yearsOfExperience": 6}
      ],
      "softSkills": ["Leadership"],
      "experience": {"totalYears": 6, "level": "Senior", "roles": ["Engineer"], "companies": ["Acme"]},
      "education": [],
      "jobRoles": ["Engineer"],
      "overallScore": 82,
      "atsScore": 77,
      "suggestions": ["Add a summary"],
      "strengths": ["Leadership"],
      "weaknesses": ["No certifications"],
      "keywordDensity": {"react": 1}
    }"#;

    #[tokio::test]
    async fn test_heuristic_run_produces_metadata() {
        let analyzer = HeuristicAnalyzer::default();
        let outcome = run_analysis(&analyzer, RESUME).await.unwrap();

        assert_eq!(outcome.metadata.backend, "heuristic");
        assert_eq!(outcome.metadata.confidence, HEURISTIC_CONFIDENCE);
        assert_eq!(outcome.analysis.experience.total_years, 6.0);
        assert_eq!(outcome.analysis.experience.level, ExperienceLevel::Senior);
        let names: Vec<&str> = outcome
            .analysis
            .technical_skills
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["React", "Node"]);
    }

    #[tokio::test]
    async fn test_heuristic_run_is_deterministic() {
        let analyzer = HeuristicAnalyzer::default();
        let first = run_analysis(&analyzer, RESUME).await.unwrap();
        let second = run_analysis(&analyzer, RESUME).await.unwrap();
        assert_eq!(first.analysis, second.analysis);
    }

    #[tokio::test]
    async fn test_short_text_is_rejected_before_backend_runs() {
        let llm = Arc::new(ScriptedLlm::text(GOOD_REPLY));
        let analyzer = LlmAnalyzer::new(llm.clone());

        let err = run_analysis(&analyzer, "   too short \n\n ").await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientContent { length: 9, minimum: 50 }
        ));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_llm_reply_is_validated() {
        let llm = Arc::new(ScriptedLlm::text(GOOD_REPLY));
        let analyzer = LlmAnalyzer::new(llm.clone());

        let outcome = run_analysis(&analyzer, RESUME).await.unwrap();
        assert_eq!(llm.calls(), 1);
        assert_eq!(outcome.metadata.backend, "scripted");
        assert_eq!(outcome.metadata.confidence, LLM_CONFIDENCE);

        let analysis = outcome.analysis;
        assert_eq!(analysis.overall_score, 82);
        assert_eq!(analysis.ats_score, 77);
        assert_eq!(analysis.technical_skills[0].category, SkillCategory::Frontend);
        assert_eq!(analysis.technical_skills[0].proficiency, Proficiency::Advanced);
        assert_eq!(analysis.experience.companies, vec!["Acme"]);
    }

    #[tokio::test]
    async fn test_malformed_llm_reply_is_an_error_not_a_fallback() {
        let llm = Arc::new(ScriptedLlm::text("Sorry, I cannot help with that."));
        let analyzer = LlmAnalyzer::new(llm);

        let err = run_analysis(&analyzer, RESUME).await.unwrap_err();
        assert!(matches!(err, AnalysisError::LlmResponseMalformed(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let llm = Arc::new(ScriptedLlm::api_error(401, "invalid api key"));
        let analyzer = LlmAnalyzer::new(llm);

        let err = run_analysis(&analyzer, RESUME).await.unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::LlmProvider(LlmError::Api { status: 401, .. })
        ));
    }
}
