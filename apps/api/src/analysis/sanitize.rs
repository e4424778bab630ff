//! Validate & default: the one place where analysis records are finalized.
//!
//! Both producers feed this module: the LLM path hands over raw response text,
//! the heuristic path hands over a record it computed itself. Either way the
//! result goes through the same `finalize_*` function, so every
//! `ResumeAnalysis` / `JobMatchAnalysis` satisfies the same invariants:
//! scores are integers in [0, 100], year counts are never negative, unknown
//! enum labels fall back to defaults, and list fields that clients render as
//! sections get a fallback when empty. Skill lists are the exception: an empty
//! list is truthful, a made-up skill is not.

use serde_json::Value;

use crate::analysis::scoring::clamp_score;
use crate::analysis::vocabulary::{
    bachelor_entry, skill_category, DEFAULT_COMPANY, DEFAULT_JOB_ROLE, DEFAULT_MATCH_RECOMMENDATIONS,
    DEFAULT_MATCH_STRENGTHS, DEFAULT_MATCH_WEAKNESSES, DEFAULT_SOFT_SKILLS, DEFAULT_STRENGTHS,
    DEFAULT_SUGGESTION, DEFAULT_WEAKNESSES,
};
use crate::analysis::AnalysisError;
use crate::llm_client::extract_json_object;
use crate::models::analysis::{
    Education, Experience, ExperienceLevel, ExperienceMatch, Importance, JobMatchAnalysis,
    MatchedSkill, MissingSkill, Proficiency, ResumeAnalysis, SkillCategory, TechnicalSkill,
};

// ────────────────────────────────────────────────────────────────────────────
// Raw (pre-validation) records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSkill {
    pub name: String,
    pub category: Option<SkillCategory>,
    pub proficiency: Option<Proficiency>,
    pub years_of_experience: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnalysis {
    pub technical_skills: Vec<RawSkill>,
    pub soft_skills: Vec<String>,
    pub total_years: Option<f64>,
    pub level: Option<ExperienceLevel>,
    pub roles: Vec<String>,
    pub companies: Vec<String>,
    pub education: Vec<Education>,
    pub job_roles: Vec<String>,
    pub overall_score: Option<f64>,
    pub ats_score: Option<f64>,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub keyword_density: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMissingSkill {
    pub skill: String,
    pub category: Option<String>,
    pub importance: Option<Importance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMatchedSkill {
    pub skill: String,
    pub category: Option<String>,
    pub proficiency: Option<Proficiency>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawJobMatch {
    pub match_score: Option<f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_skills: Vec<RawMissingSkill>,
    pub matched_skills: Vec<RawMatchedSkill>,
    pub recommendations: Vec<String>,
    pub required_years: Option<f64>,
    pub candidate_years: Option<f64>,
    pub experience_score: Option<f64>,
}

/// Where a resume analysis came from.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    Llm { raw: String },
    Heuristic { computed: RawAnalysis },
}

/// Where a job-match analysis came from.
#[derive(Debug, Clone)]
pub enum JobMatchInput {
    Llm { raw: String },
    Heuristic { computed: RawJobMatch },
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Turns either producer's output into a finished `ResumeAnalysis`.
/// Fails only when LLM text holds no parseable JSON object.
pub fn validate_analysis(input: AnalysisInput) -> Result<ResumeAnalysis, AnalysisError> {
    let raw = match input {
        AnalysisInput::Llm { raw } => RawAnalysis::from_value(&parse_llm_object(&raw)?),
        AnalysisInput::Heuristic { computed } => computed,
    };
    Ok(finalize_analysis(raw))
}

/// Turns either producer's output into a finished `JobMatchAnalysis`.
pub fn validate_job_match(input: JobMatchInput) -> Result<JobMatchAnalysis, AnalysisError> {
    let raw = match input {
        JobMatchInput::Llm { raw } => RawJobMatch::from_value(&parse_llm_object(&raw)?),
        JobMatchInput::Heuristic { computed } => computed,
    };
    Ok(finalize_job_match(raw))
}

fn parse_llm_object(raw: &str) -> Result<Value, AnalysisError> {
    let json = extract_json_object(raw).ok_or_else(|| {
        AnalysisError::LlmResponseMalformed("no JSON object found in response".to_string())
    })?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| AnalysisError::LlmResponseMalformed(format!("invalid JSON: {e}")))?;
    if !value.is_object() {
        return Err(AnalysisError::LlmResponseMalformed(
            "response JSON is not an object".to_string(),
        ));
    }
    Ok(value)
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient extraction from LLM JSON
// ────────────────────────────────────────────────────────────────────────────

/// Non-array values yield an empty list; non-string items are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn object_list(value: Option<&Value>) -> Vec<&Value> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter(|item| item.is_object()).collect())
        .unwrap_or_default()
}

/// Accepts JSON numbers and numeric strings ("5", "3.5").
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawAnalysis {
    pub fn from_value(value: &Value) -> Self {
        let experience = value.get("experience");

        let technical_skills = object_list(value.get("technicalSkills"))
            .into_iter()
            .map(|skill| RawSkill {
                name: text(skill.get("name")).unwrap_or_default(),
                category: skill
                    .get("category")
                    .and_then(|v| v.as_str())
                    .and_then(SkillCategory::from_label),
                proficiency: skill
                    .get("proficiency")
                    .and_then(|v| v.as_str())
                    .and_then(Proficiency::from_label),
                years_of_experience: number(skill.get("yearsOfExperience")),
            })
            .collect();

        let education = object_list(value.get("education"))
            .into_iter()
            .map(|entry| Education {
                degree: text(entry.get("degree")).unwrap_or_default(),
                institution: text(entry.get("institution")).unwrap_or_default(),
                year: text(entry.get("year")),
                field: text(entry.get("field")),
            })
            .collect();

        let keyword_density = value
            .get("keywordDensity")
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| number(Some(v)).map(|n| (k.clone(), n)))
                    .collect()
            })
            .unwrap_or_default();

        RawAnalysis {
            technical_skills,
            soft_skills: string_list(value.get("softSkills")),
            total_years: number(experience.and_then(|e| e.get("totalYears"))),
            level: experience
                .and_then(|e| e.get("level"))
                .and_then(|v| v.as_str())
                .and_then(ExperienceLevel::from_label),
            roles: string_list(experience.and_then(|e| e.get("roles"))),
            companies: string_list(experience.and_then(|e| e.get("companies"))),
            education,
            job_roles: string_list(value.get("jobRoles")),
            overall_score: number(value.get("overallScore")),
            ats_score: number(value.get("atsScore")),
            suggestions: string_list(value.get("suggestions")),
            strengths: string_list(value.get("strengths")),
            weaknesses: string_list(value.get("weaknesses")),
            keyword_density,
        }
    }
}

impl RawJobMatch {
    pub fn from_value(value: &Value) -> Self {
        let experience = value.get("experienceMatch");

        let missing_skills = object_list(value.get("missingSkills"))
            .into_iter()
            .map(|entry| RawMissingSkill {
                skill: text(entry.get("skill")).unwrap_or_default(),
                category: text(entry.get("category")),
                importance: entry
                    .get("importance")
                    .and_then(|v| v.as_str())
                    .and_then(Importance::from_label),
            })
            .collect();

        let matched_skills = object_list(value.get("matchedSkills"))
            .into_iter()
            .map(|entry| RawMatchedSkill {
                skill: text(entry.get("skill")).unwrap_or_default(),
                category: text(entry.get("category")),
                proficiency: entry
                    .get("proficiency")
                    .and_then(|v| v.as_str())
                    .and_then(Proficiency::from_label),
            })
            .collect();

        RawJobMatch {
            match_score: number(value.get("matchScore")),
            strengths: string_list(value.get("strengths")),
            weaknesses: string_list(value.get("weaknesses")),
            missing_skills,
            matched_skills,
            recommendations: string_list(value.get("recommendations")),
            required_years: number(experience.and_then(|e| e.get("required"))),
            candidate_years: number(experience.and_then(|e| e.get("candidate"))),
            experience_score: number(experience.and_then(|e| e.get("score"))),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Finalization
// ────────────────────────────────────────────────────────────────────────────

fn non_negative(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

fn clean_strings(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn or_default(items: Vec<String>, fallback: &[&str]) -> Vec<String> {
    let items = clean_strings(items);
    if items.is_empty() {
        fallback.iter().map(|s| s.to_string()).collect()
    } else {
        items
    }
}

fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn finalize_analysis(raw: RawAnalysis) -> ResumeAnalysis {
    let technical_skills = raw
        .technical_skills
        .into_iter()
        .filter_map(|skill| {
            let name = skill.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(TechnicalSkill {
                category: skill.category.unwrap_or_else(|| skill_category(&name)),
                proficiency: skill.proficiency.unwrap_or_default(),
                years_of_experience: non_negative(skill.years_of_experience),
                name,
            })
        })
        .collect();

    let mut education: Vec<Education> = raw
        .education
        .into_iter()
        .filter_map(|entry| {
            let degree = entry.degree.trim().to_string();
            if degree.is_empty() {
                return None;
            }
            let institution = entry.institution.trim().to_string();
            Some(Education {
                degree,
                institution: if institution.is_empty() {
                    "Not specified".to_string()
                } else {
                    institution
                },
                year: clean_optional(entry.year),
                field: clean_optional(entry.field),
            })
        })
        .collect();
    if education.is_empty() {
        education.push(bachelor_entry());
    }

    let keyword_density = raw
        .keyword_density
        .into_iter()
        .filter(|(k, v)| !k.trim().is_empty() && v.is_finite() && v.round() > 0.0)
        .map(|(k, v)| (k, v.round().min(u32::MAX as f64) as u32))
        .collect();

    ResumeAnalysis {
        technical_skills,
        soft_skills: or_default(raw.soft_skills, DEFAULT_SOFT_SKILLS),
        experience: Experience {
            total_years: non_negative(raw.total_years),
            level: raw.level.unwrap_or_default(),
            roles: or_default(raw.roles, &[DEFAULT_JOB_ROLE]),
            companies: or_default(raw.companies, &[DEFAULT_COMPANY]),
        },
        education,
        job_roles: or_default(raw.job_roles, &[DEFAULT_JOB_ROLE]),
        overall_score: clamp_score(raw.overall_score.unwrap_or(0.0)),
        ats_score: clamp_score(raw.ats_score.unwrap_or(0.0)),
        suggestions: or_default(raw.suggestions, &[DEFAULT_SUGGESTION]),
        strengths: or_default(raw.strengths, DEFAULT_STRENGTHS),
        weaknesses: or_default(raw.weaknesses, DEFAULT_WEAKNESSES),
        keyword_density,
    }
}

pub fn finalize_job_match(raw: RawJobMatch) -> JobMatchAnalysis {
    let missing_skills = raw
        .missing_skills
        .into_iter()
        .filter_map(|entry| {
            let skill = entry.skill.trim().to_string();
            (!skill.is_empty()).then(|| MissingSkill {
                skill,
                category: clean_optional(entry.category),
                importance: entry.importance.unwrap_or_default(),
            })
        })
        .collect();

    let matched_skills = raw
        .matched_skills
        .into_iter()
        .filter_map(|entry| {
            let skill = entry.skill.trim().to_string();
            (!skill.is_empty()).then(|| MatchedSkill {
                skill,
                category: clean_optional(entry.category),
                proficiency: entry.proficiency.unwrap_or_default(),
            })
        })
        .collect();

    JobMatchAnalysis {
        match_score: clamp_score(raw.match_score.unwrap_or(0.0)),
        strengths: or_default(raw.strengths, DEFAULT_MATCH_STRENGTHS),
        weaknesses: or_default(raw.weaknesses, DEFAULT_MATCH_WEAKNESSES),
        missing_skills,
        matched_skills,
        recommendations: or_default(raw.recommendations, DEFAULT_MATCH_RECOMMENDATIONS),
        experience_match: ExperienceMatch {
            required: non_negative(raw.required_years),
            candidate: non_negative(raw.candidate_years),
            score: clamp_score(raw.experience_score.unwrap_or(0.0)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn llm(raw: &str) -> Result<ResumeAnalysis, AnalysisError> {
        validate_analysis(AnalysisInput::Llm {
            raw: raw.to_string(),
        })
    }

    fn assert_lists_filled(analysis: &ResumeAnalysis) {
        assert!(!analysis.soft_skills.is_empty());
        assert!(!analysis.experience.roles.is_empty());
        assert!(!analysis.experience.companies.is_empty());
        assert!(!analysis.education.is_empty());
        assert!(!analysis.job_roles.is_empty());
        assert!(!analysis.suggestions.is_empty());
        assert!(!analysis.strengths.is_empty());
        assert!(!analysis.weaknesses.is_empty());
    }

    #[test]
    fn test_well_formed_llm_response_passes_through() {
        let raw = json!({
            "technicalSkills": [
                {"name": "Rust", "category": "Backend", "proficiency": "Expert", "yearsOfExperience": 4}
            ],
            "softSkills": ["Mentoring"],
            "experience": {"totalYears": 6, "level": "Senior", "roles": ["Engineer"], "companies": ["Acme"]},
            "education": [{"degree": "BSc", "institution": "MIT", "year": "2015", "field": "CS"}],
            "jobRoles": ["Backend Engineer"],
            "overallScore": 82,
            "atsScore": 77,
            "suggestions": ["Add metrics"],
            "strengths": ["Depth in Rust"],
            "weaknesses": ["Few open-source links"],
            "keywordDensity": {"rust": 5, "team": 0}
        })
        .to_string();

        let analysis = llm(&raw).unwrap();
        assert_eq!(analysis.technical_skills[0].category, SkillCategory::Backend);
        assert_eq!(analysis.technical_skills[0].proficiency, Proficiency::Expert);
        assert_eq!(analysis.experience.level, ExperienceLevel::Senior);
        assert_eq!(analysis.experience.companies, vec!["Acme"]);
        assert_eq!(analysis.overall_score, 82);
        assert_eq!(analysis.ats_score, 77);
        assert_eq!(analysis.keyword_density.get("rust"), Some(&5));
        assert!(!analysis.keyword_density.contains_key("team"));
    }

    #[test]
    fn test_malformed_fields_fall_back_to_defaults() {
        let raw = r#"{
            "technicalSkills": "react, node",
            "softSkills": null,
            "experience": {"totalYears": -3, "level": "Wizard", "roles": 7},
            "education": {"degree": "BSc"},
            "jobRoles": [],
            "overallScore": "lots",
            "suggestions": [1, 2, "  "],
            "keywordDensity": ["team"]
        }"#;

        let analysis = llm(raw).unwrap();
        assert!(analysis.technical_skills.is_empty());
        assert_eq!(analysis.soft_skills, DEFAULT_SOFT_SKILLS);
        assert_eq!(analysis.experience.total_years, 0.0);
        assert_eq!(analysis.experience.level, ExperienceLevel::Entry);
        assert_eq!(analysis.experience.roles, vec![DEFAULT_JOB_ROLE]);
        assert_eq!(analysis.education, vec![bachelor_entry()]);
        assert_eq!(analysis.overall_score, 0);
        assert_eq!(analysis.suggestions, vec![DEFAULT_SUGGESTION]);
        assert!(analysis.keyword_density.is_empty());
        assert_lists_filled(&analysis);
    }

    #[test]
    fn test_scores_are_rounded_and_clamped() {
        let analysis = llm(r#"{"overallScore": 150, "atsScore": -20}"#).unwrap();
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(analysis.ats_score, 0);

        let analysis = llm(r#"{"overallScore": 72.6, "atsScore": "64"}"#).unwrap();
        assert_eq!(analysis.overall_score, 73);
        assert_eq!(analysis.ats_score, 64);

        // overflowing numeric strings parse to infinity and clamp to the bound
        let analysis = llm(r#"{"overallScore": "1e400", "atsScore": "inf"}"#).unwrap();
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(analysis.ats_score, 100);

        let analysis = llm(r#"{"overallScore": "-inf", "atsScore": "NaN"}"#).unwrap();
        assert_eq!(analysis.overall_score, 0);
        assert_eq!(analysis.ats_score, 0);
    }

    #[test]
    fn test_skill_defaults_for_unknown_labels() {
        let raw = r#"{"technicalSkills": [
            {"name": "React", "category": "Quantum", "proficiency": "Guru", "yearsOfExperience": -2},
            {"name": "  "},
            {"category": "Backend"},
            "Docker"
        ]}"#;
        let analysis = llm(raw).unwrap();
        assert_eq!(analysis.technical_skills.len(), 1);
        let skill = &analysis.technical_skills[0];
        // unknown label falls back to the vocabulary table
        assert_eq!(skill.category, SkillCategory::Frontend);
        assert_eq!(skill.proficiency, Proficiency::Intermediate);
        assert_eq!(skill.years_of_experience, 0.0);
    }

    #[test]
    fn test_json_embedded_in_prose_is_extracted() {
        let raw = "Sure! Here is the analysis:\n```json\n{\"overallScore\": 55}\n```";
        assert_eq!(llm(raw).unwrap().overall_score, 55);
    }

    #[test]
    fn test_response_without_object_is_malformed() {
        assert!(matches!(
            llm("I cannot analyze this resume."),
            Err(AnalysisError::LlmResponseMalformed(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        assert!(matches!(
            llm("{ overallScore: 55, }"),
            Err(AnalysisError::LlmResponseMalformed(_))
        ));
    }

    #[test]
    fn test_heuristic_input_gets_same_defaults() {
        let analysis = validate_analysis(AnalysisInput::Heuristic {
            computed: RawAnalysis {
                overall_score: Some(250.0),
                ..Default::default()
            },
        })
        .unwrap();
        assert_eq!(analysis.overall_score, 100);
        assert_eq!(analysis.strengths, DEFAULT_STRENGTHS);
        assert_lists_filled(&analysis);
    }

    #[test]
    fn test_job_match_llm_response_is_clamped_and_defaulted() {
        let raw = r#"{
            "matchScore": 140,
            "missingSkills": [{"skill": "Kafka", "importance": "Critical"}, {"skill": ""}],
            "matchedSkills": [{"skill": "Rust", "category": "Backend"}],
            "experienceMatch": {"required": 5, "candidate": -1, "score": 300}
        }"#;
        let analysis = validate_job_match(JobMatchInput::Llm {
            raw: raw.to_string(),
        })
        .unwrap();
        assert_eq!(analysis.match_score, 100);
        assert_eq!(analysis.missing_skills.len(), 1);
        assert_eq!(analysis.missing_skills[0].importance, Importance::Medium);
        assert_eq!(analysis.matched_skills[0].proficiency, Proficiency::Intermediate);
        assert_eq!(analysis.experience_match.required, 5.0);
        assert_eq!(analysis.experience_match.candidate, 0.0);
        assert_eq!(analysis.experience_match.score, 100);
        assert_eq!(analysis.strengths, DEFAULT_MATCH_STRENGTHS);
        assert_eq!(analysis.weaknesses, DEFAULT_MATCH_WEAKNESSES);
        assert_eq!(analysis.recommendations, DEFAULT_MATCH_RECOMMENDATIONS);
    }

    #[test]
    fn test_job_match_array_response_is_malformed() {
        let result = validate_job_match(JobMatchInput::Llm {
            raw: "[1, 2, 3]".to_string(),
        });
        assert!(matches!(result, Err(AnalysisError::LlmResponseMalformed(_))));
    }
}
