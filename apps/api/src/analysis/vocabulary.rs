//! Fixed, read-only vocabularies used by the heuristic path.

use crate::models::analysis::{Education, Proficiency, SkillCategory};

/// A technical skill the heuristic matcher recognises.
#[derive(Debug, Clone, Copy)]
pub struct SkillTerm {
    /// Lowercase search term.
    pub term: &'static str,
    pub display: &'static str,
    pub category: SkillCategory,
}

pub const TECHNICAL_SKILLS: &[SkillTerm] = &[
    SkillTerm { term: "javascript", display: "JavaScript", category: SkillCategory::Frontend },
    SkillTerm { term: "python", display: "Python", category: SkillCategory::Backend },
    SkillTerm { term: "java", display: "Java", category: SkillCategory::Backend },
    SkillTerm { term: "react", display: "React", category: SkillCategory::Frontend },
    SkillTerm { term: "node", display: "Node", category: SkillCategory::Backend },
    SkillTerm { term: "sql", display: "SQL", category: SkillCategory::Database },
    SkillTerm { term: "html", display: "HTML", category: SkillCategory::Frontend },
    SkillTerm { term: "css", display: "CSS", category: SkillCategory::Frontend },
    SkillTerm { term: "angular", display: "Angular", category: SkillCategory::Frontend },
    SkillTerm { term: "vue", display: "Vue", category: SkillCategory::Frontend },
    SkillTerm { term: "mongodb", display: "MongoDB", category: SkillCategory::Database },
    SkillTerm { term: "postgresql", display: "PostgreSQL", category: SkillCategory::Database },
];

/// Category for a skill name; anything outside the table is `Other`.
pub fn skill_category(name: &str) -> SkillCategory {
    let lower = name.to_lowercase();
    TECHNICAL_SKILLS
        .iter()
        .find(|s| s.term == lower)
        .map(|s| s.category)
        .unwrap_or(SkillCategory::Other)
}

/// Qualifier prefixes in priority order; the first that precedes a skill wins.
pub const PROFICIENCY_QUALIFIERS: &[(&str, Proficiency)] = &[
    ("expert", Proficiency::Expert),
    ("advanced", Proficiency::Expert),
    ("senior", Proficiency::Advanced),
    ("lead", Proficiency::Advanced),
    ("intermediate", Proficiency::Intermediate),
];

/// Soft skill label and the trigger stems that imply it, in output order.
pub const SOFT_SKILL_TRIGGERS: &[(&str, &[&str])] = &[
    ("Teamwork", &["team", "collaborate"]),
    ("Leadership", &["lead", "manage"]),
    ("Problem Solving", &["problem", "solve"]),
    ("Communication", &["communicate", "present"]),
];

pub const DEFAULT_SOFT_SKILLS: &[&str] = &["Communication", "Leadership", "Problem Solving"];

pub const BACHELOR_TRIGGERS: &[&str] = &["bachelor", "bs", "ba"];
pub const MASTER_TRIGGERS: &[&str] = &["master", "ms", "ma"];

pub fn bachelor_entry() -> Education {
    Education {
        degree: "Bachelor's Degree".to_string(),
        institution: "University".to_string(),
        year: Some("2020".to_string()),
        field: Some("Computer Science".to_string()),
    }
}

pub fn master_entry() -> Education {
    Education {
        degree: "Master's Degree".to_string(),
        institution: "University".to_string(),
        year: Some("2022".to_string()),
        field: Some("Computer Science".to_string()),
    }
}

pub const JOB_ROLES: &[&str] = &[
    "Developer",
    "Engineer",
    "Analyst",
    "Manager",
    "Consultant",
    "Specialist",
];

pub const DEFAULT_JOB_ROLE: &str = "Software Developer";
pub const DEFAULT_COMPANY: &str = "Not specified";

/// Keywords counted for `keywordDensity`.
pub const DENSITY_KEYWORDS: &[&str] = &[
    "experience",
    "skills",
    "project",
    "team",
    "development",
    "management",
];

pub const DEFAULT_SUGGESTION: &str =
    "Great resume! Consider adding more specific examples of your achievements.";
pub const DEFAULT_STRENGTHS: &[&str] = &["Technical background", "Relevant experience"];
pub const DEFAULT_WEAKNESSES: &[&str] = &["Consider adding more quantifiable achievements"];

pub const DEFAULT_MATCH_STRENGTHS: &[&str] = &["Transferable technical background"];
pub const DEFAULT_MATCH_WEAKNESSES: &[&str] =
    &["No significant gaps detected against this job description"];
pub const DEFAULT_MATCH_RECOMMENDATIONS: &[&str] =
    &["Tailor your resume summary to mirror the job description's key requirements"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_category_lookup() {
        assert_eq!(skill_category("React"), SkillCategory::Frontend);
        assert_eq!(skill_category("postgresql"), SkillCategory::Database);
        assert_eq!(skill_category("Rust"), SkillCategory::Other);
    }

    #[test]
    fn test_skill_terms_are_lowercase() {
        for skill in TECHNICAL_SKILLS {
            assert_eq!(skill.term, skill.term.to_lowercase());
        }
    }
}
