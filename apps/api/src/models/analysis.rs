//! Analysis value types shared by the heuristic and LLM paths.
//!
//! Field names serialize in camelCase: the same shape is requested from the LLM,
//! stored as JSON, and returned to clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    Frontend,
    Backend,
    Database,
    DevOps,
    #[serde(rename = "AI/ML")]
    AiMl,
    Mobile,
    Design,
    Other,
}

impl SkillCategory {
    /// Case-insensitive lookup of a category label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let category = match label.trim().to_ascii_lowercase().as_str() {
            "frontend" => SkillCategory::Frontend,
            "backend" => SkillCategory::Backend,
            "database" => SkillCategory::Database,
            "devops" => SkillCategory::DevOps,
            "ai/ml" | "ai" | "ml" => SkillCategory::AiMl,
            "mobile" => SkillCategory::Mobile,
            "design" => SkillCategory::Design,
            "other" => SkillCategory::Other,
            _ => return None,
        };
        Some(category)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Frontend => "Frontend",
            SkillCategory::Backend => "Backend",
            SkillCategory::Database => "Database",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::AiMl => "AI/ML",
            SkillCategory::Mobile => "Mobile",
            SkillCategory::Design => "Design",
            SkillCategory::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Proficiency {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Proficiency::Beginner),
            "intermediate" => Some(Proficiency::Intermediate),
            "advanced" => Some(Proficiency::Advanced),
            "expert" => Some(Proficiency::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
}

impl ExperienceLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "entry" => Some(ExperienceLevel::Entry),
            "mid" => Some(ExperienceLevel::Mid),
            "senior" => Some(ExperienceLevel::Senior),
            "lead" => Some(ExperienceLevel::Lead),
            "executive" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }

    /// Level implied by total years: <2 Entry, <5 Mid, otherwise Senior.
    pub fn from_years(total_years: f64) -> Self {
        if total_years < 2.0 {
            ExperienceLevel::Entry
        } else if total_years < 5.0 {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Senior
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Importance::Low),
            "medium" => Some(Importance::Medium),
            "high" => Some(Importance::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSkill {
    pub name: String,
    pub category: SkillCategory,
    pub proficiency: Proficiency,
    pub years_of_experience: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub total_years: f64,
    pub level: ExperienceLevel,
    pub roles: Vec<String>,
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Full structured analysis of one resume. Produced once per input text and
/// replaced wholesale on regeneration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub technical_skills: Vec<TechnicalSkill>,
    pub soft_skills: Vec<String>,
    pub experience: Experience,
    pub education: Vec<Education>,
    pub job_roles: Vec<String>,
    pub overall_score: u32,
    pub ats_score: u32,
    pub suggestions: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub keyword_density: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub importance: Importance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedSkill {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceMatch {
    pub required: f64,
    pub candidate: f64,
    pub score: u32,
}

/// Comparison of a resume analysis against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchAnalysis {
    pub match_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_skills: Vec<MissingSkill>,
    pub matched_skills: Vec<MatchedSkill>,
    pub recommendations: Vec<String>,
    pub experience_match: ExperienceMatch,
}

/// Provenance recorded next to every persisted analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub processing_time_ms: u64,
    pub backend: String,
    pub confidence: f64,
}
