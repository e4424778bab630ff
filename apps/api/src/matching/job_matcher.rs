//! Job matchers: compare one resume analysis against one job description.
//!
//! Default: `HeuristicJobMatcher` (deterministic, category-capped like the
//! resume scorer). `LlmJobMatcher` asks the chat model and validates the reply
//! through the same finalize pass.
//!
//! `AppState` holds an `Arc<dyn JobMatcher>`.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::analysis::matcher::KeywordMatcher;
use crate::analysis::sanitize::{
    validate_job_match, JobMatchInput, RawJobMatch, RawMatchedSkill, RawMissingSkill,
};
use crate::analysis::vocabulary::DEFAULT_JOB_ROLE;
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::json_system_prompt;
use crate::llm_client::{CompletionRequest, LlmError, LlmProvider};
use crate::matching::prompts::{
    build_job_match_prompt, JOB_MATCH_MAX_TOKENS, JOB_MATCH_ROLE, JOB_MATCH_TEMPERATURE,
};
use crate::models::analysis::{Importance, JobMatchAnalysis, ResumeAnalysis};

/// Category caps. Sum is 100.
pub const MAX_SKILLS_POINTS: f64 = 70.0;
pub const MAX_EXPERIENCE_POINTS: f64 = 20.0;
pub const ROLE_ALIGNMENT_POINTS: f64 = 10.0;

/// Skills contribution when the description names no vocabulary skill.
const NEUTRAL_SKILLS_POINTS: f64 = 35.0;

pub const HEURISTIC_MATCH_CONFIDENCE: f64 = 1.0;
pub const LLM_MATCH_CONFIDENCE: f64 = 0.85;

static REQUIRED_YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*\+?\s*(?:years?|yrs?)\b").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait JobMatcher: Send + Sync {
    async fn compare(
        &self,
        resume: &ResumeAnalysis,
        resume_text: &str,
        job_description: &str,
    ) -> Result<JobMatchAnalysis, AnalysisError>;

    fn backend(&self) -> &str;

    fn confidence(&self) -> f64;
}

/// Years from the first `<n>[+] year(s)/yr(s)` mention, 0 when absent.
pub fn required_years(job_description: &str) -> f64 {
    REQUIRED_YEARS_RE
        .captures(job_description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// 100 when nothing is required, otherwise the candidate/required ratio capped at 100.
pub fn experience_score(required: f64, candidate: f64) -> f64 {
    if required <= 0.0 {
        return 100.0;
    }
    (100.0 * candidate / required).round().min(100.0)
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicJobMatcher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct HeuristicJobMatcher {
    matcher: KeywordMatcher,
}

impl HeuristicJobMatcher {
    pub fn new(matcher: KeywordMatcher) -> Self {
        Self { matcher }
    }

    /// Builds the raw comparison; fallbacks are left to `finalize_job_match`.
    pub fn build(
        &self,
        resume: &ResumeAnalysis,
        resume_text: &str,
        job_description: &str,
    ) -> RawJobMatch {
        let jd_lower = job_description.to_lowercase();
        let resume_lower = resume_text.to_lowercase();
        let required = self.matcher.find_skills(job_description);

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for skill in &required {
            let owned = resume
                .technical_skills
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(skill.display));
            if owned.is_some() || self.matcher.contains_term(&resume_lower, skill.term) {
                matched.push(RawMatchedSkill {
                    skill: skill.display.to_string(),
                    category: Some(skill.category.as_str().to_string()),
                    proficiency: owned.map(|s| s.proficiency),
                });
            } else {
                missing.push(RawMissingSkill {
                    skill: skill.display.to_string(),
                    category: Some(skill.category.as_str().to_string()),
                    importance: Some(self.importance(&jd_lower, skill.term)),
                });
            }
        }

        let skills_points = if required.is_empty() {
            NEUTRAL_SKILLS_POINTS
        } else {
            (MAX_SKILLS_POINTS * matched.len() as f64 / required.len() as f64).round()
        };

        let required_years = required_years(job_description);
        let candidate_years = resume.experience.total_years.max(0.0);
        let exp_score = experience_score(required_years, candidate_years);
        let exp_points = (exp_score / 5.0).round().min(MAX_EXPERIENCE_POINTS);

        // the fallback role is not evidence of anything
        let roles_detected = resume.job_roles != [DEFAULT_JOB_ROLE];
        let role_aligned = roles_detected
            && resume
                .job_roles
                .iter()
                .any(|role| self.matcher.contains_stem(&jd_lower, &role.to_lowercase()));
        let role_points = if role_aligned { ROLE_ALIGNMENT_POINTS } else { 0.0 };

        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();
        let mut recommendations = Vec::new();

        if !matched.is_empty() {
            strengths.push(format!(
                "Matches {} of {} required skills: {}",
                matched.len(),
                required.len(),
                join_names(matched.iter().map(|m| m.skill.as_str()))
            ));
        }
        if required_years > 0.0 && exp_score >= 100.0 {
            strengths.push(format!(
                "Meets the {required_years}+ year experience requirement"
            ));
        }
        if role_aligned {
            strengths.push("Previous role aligns with this position".to_string());
        }

        if !missing.is_empty() {
            weaknesses.push(format!(
                "Missing skills: {}",
                join_names(missing.iter().map(|m| m.skill.as_str()))
            ));
        }
        if exp_score < 100.0 {
            weaknesses.push(format!(
                "{candidate_years} years of experience against {required_years} required"
            ));
        }

        for gap in missing
            .iter()
            .filter(|m| m.importance == Some(Importance::High))
        {
            recommendations.push(format!(
                "Gain hands-on experience with {}; it is listed as a requirement",
                gap.skill
            ));
        }
        let optional: Vec<&str> = missing
            .iter()
            .filter(|m| m.importance != Some(Importance::High))
            .map(|m| m.skill.as_str())
            .collect();
        if !optional.is_empty() {
            recommendations.push(format!(
                "Consider learning {} to strengthen your fit",
                join_names(optional.into_iter())
            ));
        }
        if exp_score < 100.0 {
            recommendations.push(
                "Emphasize projects that show depth comparable to the required experience"
                    .to_string(),
            );
        }

        RawJobMatch {
            match_score: Some(skills_points + exp_points + role_points),
            strengths,
            weaknesses,
            missing_skills: missing,
            matched_skills: matched,
            recommendations,
            required_years: Some(required_years),
            candidate_years: Some(candidate_years),
            experience_score: Some(exp_score),
        }
    }

    /// High when the skill shares a sentence with "required"/"must", Medium
    /// when mentioned at least twice, Low otherwise. `jd_lower` is lowercase.
    fn importance(&self, jd_lower: &str, term: &str) -> Importance {
        let in_requirement = jd_lower
            .split(|c: char| matches!(c, '.' | '!' | '?' | ';' | '\n'))
            .any(|sentence| {
                self.matcher.contains_term(sentence, term)
                    && (self.matcher.contains_stem(sentence, "required")
                        || self.matcher.contains_term(sentence, "must"))
            });
        if in_requirement {
            Importance::High
        } else if self.matcher.count_term(jd_lower, term) >= 2 {
            Importance::Medium
        } else {
            Importance::Low
        }
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

#[async_trait]
impl JobMatcher for HeuristicJobMatcher {
    async fn compare(
        &self,
        resume: &ResumeAnalysis,
        resume_text: &str,
        job_description: &str,
    ) -> Result<JobMatchAnalysis, AnalysisError> {
        let computed = self.build(resume, resume_text, job_description);
        validate_job_match(JobMatchInput::Heuristic { computed })
    }

    fn backend(&self) -> &str {
        "heuristic"
    }

    fn confidence(&self) -> f64 {
        HEURISTIC_MATCH_CONFIDENCE
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmJobMatcher
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmJobMatcher {
    llm: Arc<dyn LlmProvider>,
}

impl LlmJobMatcher {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobMatcher for LlmJobMatcher {
    async fn compare(
        &self,
        resume: &ResumeAnalysis,
        _resume_text: &str,
        job_description: &str,
    ) -> Result<JobMatchAnalysis, AnalysisError> {
        let analysis_json = serde_json::to_string_pretty(resume).map_err(LlmError::from)?;
        let system = json_system_prompt(JOB_MATCH_ROLE);
        let prompt = build_job_match_prompt(&analysis_json, job_description);

        let raw = self
            .llm
            .complete(CompletionRequest {
                system: &system,
                prompt: &prompt,
                temperature: JOB_MATCH_TEMPERATURE,
                max_tokens: JOB_MATCH_MAX_TOKENS,
            })
            .await?;

        debug!(model = self.llm.model(), reply_chars = raw.len(), "LLM match reply received");
        validate_job_match(JobMatchInput::Llm { raw })
    }

    fn backend(&self) -> &str {
        self.llm.model()
    }

    fn confidence(&self) -> f64 {
        LLM_MATCH_CONFIDENCE
    }
}
