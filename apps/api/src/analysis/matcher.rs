//! Keyword / skill matcher over normalized text.
//!
//! Two containment modes:
//! - `WordBoundary` (default): a term only counts when it is not glued to
//!   neighbouring letters or digits, so "java" no longer fires inside "javascript".
//! - `Substring`: plain case-insensitive containment, byte-compatible with
//!   legacy analyses.

use std::collections::BTreeMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::vocabulary::{
    bachelor_entry, master_entry, SkillTerm, BACHELOR_TRIGGERS, DENSITY_KEYWORDS, JOB_ROLES,
    MASTER_TRIGGERS, PROFICIENCY_QUALIFIERS, SOFT_SKILL_TRIGGERS, TECHNICAL_SKILLS,
};
use crate::models::analysis::{Education, Proficiency};

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:year|yr)").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    WordBoundary,
    Substring,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::WordBoundary => "word_boundary",
            MatchMode::Substring => "substring",
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word_boundary" | "word-boundary" | "word" => Ok(MatchMode::WordBoundary),
            "substring" | "legacy" => Ok(MatchMode::Substring),
            other => Err(format!(
                "unknown skill match mode '{other}' (expected 'word_boundary' or 'substring')"
            )),
        }
    }
}

/// Vocabulary matcher. Cheap to copy; holds only the containment mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordMatcher {
    mode: MatchMode,
}

impl KeywordMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Whole-term presence. `text` must already be lowercase.
    pub fn contains_term(&self, text: &str, term: &str) -> bool {
        match self.mode {
            MatchMode::Substring => text.contains(term),
            MatchMode::WordBoundary => find_bounded(text, term, true),
        }
    }

    /// Stem presence: the term must start a word but may be followed by a
    /// suffix ("manage" matches "managed"). `text` must already be lowercase.
    pub fn contains_stem(&self, text: &str, stem: &str) -> bool {
        match self.mode {
            MatchMode::Substring => text.contains(stem),
            MatchMode::WordBoundary => find_bounded(text, stem, false),
        }
    }

    /// Number of whole-term occurrences. `text` must already be lowercase.
    pub fn count_term(&self, text: &str, term: &str) -> usize {
        match self.mode {
            MatchMode::Substring if term.is_empty() => 0,
            MatchMode::Substring => text.matches(term).count(),
            MatchMode::WordBoundary => bounded_matches(text, term, true).count(),
        }
    }

    /// Vocabulary skills present in the text, in vocabulary order.
    pub fn find_skills(&self, text: &str) -> Vec<&'static SkillTerm> {
        let lower = text.to_lowercase();
        TECHNICAL_SKILLS
            .iter()
            .filter(|skill| self.contains_term(&lower, skill.term))
            .collect()
    }

    /// Proficiency from the first qualifier phrase ("expert react", ...) found
    /// in priority order. Beginner when none is present.
    pub fn proficiency(&self, text: &str, term: &str) -> Proficiency {
        let lower = text.to_lowercase();
        let term = term.to_lowercase();
        PROFICIENCY_QUALIFIERS
            .iter()
            .find(|(qualifier, _)| self.contains_term(&lower, &format!("{qualifier} {term}")))
            .map(|(_, level)| *level)
            .unwrap_or(Proficiency::Beginner)
    }

    /// Soft skills whose trigger stems appear. May be empty.
    pub fn soft_skills(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        SOFT_SKILL_TRIGGERS
            .iter()
            .filter(|(_, stems)| stems.iter().any(|s| self.contains_stem(&lower, s)))
            .map(|(label, _)| label.to_string())
            .collect()
    }

    /// Degree entries implied by degree keywords. May be empty.
    pub fn education(&self, text: &str) -> Vec<Education> {
        let lower = text.to_lowercase();
        let mut education = Vec::new();
        if BACHELOR_TRIGGERS
            .iter()
            .any(|t| self.contains_term(&lower, t))
        {
            education.push(bachelor_entry());
        }
        if MASTER_TRIGGERS.iter().any(|t| self.contains_term(&lower, t)) {
            education.push(master_entry());
        }
        education
    }

    /// Job-role titles that appear. May be empty.
    pub fn job_roles(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        JOB_ROLES
            .iter()
            .filter(|role| self.contains_stem(&lower, &role.to_lowercase()))
            .map(|role| role.to_string())
            .collect()
    }
}

/// Years from the first `<number> year(s)/yr(s)` mention, if any.
pub fn extract_total_years(text: &str) -> Option<f64> {
    YEARS_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Occurrences of each density keyword, counted per whitespace-separated word
/// that contains it. Keywords with no occurrence are omitted.
pub fn keyword_density(text: &str) -> BTreeMap<String, u32> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    DENSITY_KEYWORDS
        .iter()
        .filter_map(|keyword| {
            let count = words.iter().filter(|w| w.contains(keyword)).count() as u32;
            (count > 0).then(|| (keyword.to_string(), count))
        })
        .collect()
}

/// True when `needle` occurs with no alphanumeric character directly before it
/// and, if `require_end`, none directly after it. Edges of the needle that are
/// punctuation ("c++", "%") need no boundary on that side.
fn find_bounded(haystack: &str, needle: &str, require_end: bool) -> bool {
    bounded_matches(haystack, needle, require_end).next().is_some()
}

fn bounded_matches<'a>(
    haystack: &'a str,
    needle: &'a str,
    require_end: bool,
) -> impl Iterator<Item = usize> + 'a {
    let check_start = needle.starts_with(|c: char| c.is_alphanumeric());
    let check_end = require_end && needle.ends_with(|c: char| c.is_alphanumeric());

    haystack
        .match_indices(needle)
        .filter(move |_| !needle.is_empty())
        .map(|(idx, _)| idx)
        .filter(move |&idx| {
            let before_ok = !check_start
                || haystack[..idx]
                    .chars()
                    .next_back()
                    .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = !check_end
                || haystack[idx + needle.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(skills: &[&SkillTerm]) -> Vec<&'static str> {
        skills.iter().map(|s| s.term).collect()
    }

    #[test]
    fn test_word_boundary_does_not_match_java_inside_javascript() {
        let matcher = KeywordMatcher::new(MatchMode::WordBoundary);
        let found = matcher.find_skills("Built dashboards in JavaScript and PostgreSQL");
        assert_eq!(names(&found), vec!["javascript", "postgresql"]);
    }

    #[test]
    fn test_substring_mode_keeps_legacy_false_positives() {
        let matcher = KeywordMatcher::new(MatchMode::Substring);
        let found = matcher.find_skills("Built dashboards in JavaScript and PostgreSQL");
        // "java" inside "javascript", "sql" inside "postgresql"
        assert_eq!(
            names(&found),
            vec!["javascript", "java", "sql", "postgresql"]
        );
    }

    #[test]
    fn test_word_boundary_accepts_punctuation_neighbours() {
        let matcher = KeywordMatcher::default();
        let found = matcher.find_skills("Stack: node.js, (react), vue/css");
        assert_eq!(names(&found), vec!["react", "node", "css", "vue"]);
    }

    #[test]
    fn test_proficiency_priority_order() {
        let matcher = KeywordMatcher::default();
        assert_eq!(
            matcher.proficiency("advanced react and senior react", "react"),
            Proficiency::Expert
        );
        assert_eq!(
            matcher.proficiency("lead python engineer", "python"),
            Proficiency::Advanced
        );
        assert_eq!(
            matcher.proficiency("intermediate sql skills", "sql"),
            Proficiency::Intermediate
        );
        assert_eq!(
            matcher.proficiency("wrote some css", "css"),
            Proficiency::Beginner
        );
    }

    #[test]
    fn test_soft_skills_use_stems() {
        let matcher = KeywordMatcher::default();
        let skills = matcher.soft_skills("Managed a team and presented results");
        assert_eq!(skills, vec!["Teamwork", "Leadership", "Communication"]);
    }

    #[test]
    fn test_soft_skills_empty_when_no_trigger() {
        let matcher = KeywordMatcher::default();
        assert!(matcher.soft_skills("quiet individual contributor").is_empty());
    }

    #[test]
    fn test_education_word_boundary_ignores_short_tokens_inside_words() {
        let matcher = KeywordMatcher::new(MatchMode::WordBoundary);
        // "ma" inside "manager", "ba" inside "database"
        assert!(matcher.education("database manager").is_empty());

        let legacy = KeywordMatcher::new(MatchMode::Substring);
        assert_eq!(legacy.education("database manager").len(), 2);
    }

    #[test]
    fn test_education_detects_both_degrees() {
        let matcher = KeywordMatcher::default();
        let education = matcher.education("Bachelor of Science, Master of Engineering");
        assert_eq!(education.len(), 2);
        assert_eq!(education[0].degree, "Bachelor's Degree");
        assert_eq!(education[1].degree, "Master's Degree");
    }

    #[test]
    fn test_job_roles_match_plurals() {
        let matcher = KeywordMatcher::default();
        assert_eq!(
            matcher.job_roles("worked with developers and data analysts"),
            vec!["Developer", "Analyst"]
        );
    }

    #[test]
    fn test_extract_total_years_first_mention() {
        assert_eq!(extract_total_years("7 years of Rust, 2 years of Go"), Some(7.0));
        assert_eq!(extract_total_years("3yrs experience"), Some(3.0));
        assert_eq!(extract_total_years("no tenure stated"), None);
    }

    #[test]
    fn test_keyword_density_counts_words_and_omits_zero() {
        let density = keyword_density("Team player. Teamwork on project management projects");
        assert_eq!(density.get("team"), Some(&2));
        assert_eq!(density.get("project"), Some(&2));
        assert_eq!(density.get("management"), Some(&1));
        assert!(!density.contains_key("experience"));
    }

    #[test]
    fn test_count_term_respects_mode() {
        let text = "java, javascript and more java";
        assert_eq!(KeywordMatcher::new(MatchMode::WordBoundary).count_term(text, "java"), 2);
        assert_eq!(KeywordMatcher::new(MatchMode::Substring).count_term(text, "java"), 3);
        assert_eq!(KeywordMatcher::default().count_term(text, "rust"), 0);
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("substring".parse::<MatchMode>(), Ok(MatchMode::Substring));
        assert_eq!(
            "word_boundary".parse::<MatchMode>(),
            Ok(MatchMode::WordBoundary)
        );
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }
}
