//! Heuristic resume scoring.
//!
//! Both scores are sums of per-category contributions. Each category is capped
//! on its own and the caps add up to exactly 100:
//!
//! | overall      | cap | ats        | cap |
//! |--------------|-----|------------|-----|
//! | skills       | 30  | keywords   | 40  |
//! | experience   | 25  | structure  | 30  |
//! | education    | 20  | format     | 30  |
//! | contact      | 10  |            |     |
//! | achievements | 15  |            |     |
//!
//! The point values are a fixed product rubric and are reproduced as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static YEARS_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+\s*(?:year|yr)").unwrap());
static PHONE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{10}").unwrap());
static FOUR_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

const ATS_KEYWORDS: &[&str] = &[
    "experience",
    "skills",
    "education",
    "work",
    "project",
    "team",
    "management",
];

pub const SKILLS_CAP: u32 = 30;
pub const EXPERIENCE_CAP: u32 = 25;
pub const EDUCATION_CAP: u32 = 20;
pub const CONTACT_CAP: u32 = 10;
pub const ACHIEVEMENTS_CAP: u32 = 15;

pub const KEYWORDS_CAP: u32 = 40;
pub const STRUCTURE_CAP: u32 = 30;
pub const FORMAT_CAP: u32 = 30;

/// Clamps any upstream number into an integer score in [0, 100].
/// NaN counts as 0, infinities clamp to the nearer bound; fractions round
/// half away from zero.
pub fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

fn points(condition: bool, value: u32) -> u32 {
    if condition {
        value
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallBreakdown {
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
    pub contact: u32,
    pub achievements: u32,
}

impl OverallBreakdown {
    pub fn total(&self) -> u32 {
        self.skills + self.experience + self.education + self.contact + self.achievements
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub keywords: u32,
    pub structure: u32,
    pub format: u32,
}

impl AtsBreakdown {
    pub fn total(&self) -> u32 {
        self.keywords + self.structure + self.format
    }
}

pub fn overall_breakdown(text: &str, skill_count: usize) -> OverallBreakdown {
    let text = text.to_lowercase();

    let skills = (skill_count.min(SKILLS_CAP as usize) as u32 * 3).min(SKILLS_CAP);

    let experience = points(contains_any(&text, &["experience", "worked", "developed"]), 15)
        + points(YEARS_MENTION_RE.is_match(&text), 10);

    let education = points(contains_any(&text, &["degree", "university", "college"]), 15)
        + points(contains_any(&text, &["bachelor", "master", "phd"]), 5);

    let contact = points(text.contains('@') && text.contains(".com"), 5)
        + points(PHONE_RUN_RE.is_match(&text), 5);

    let achievements = points(contains_any(&text, &["achieved", "improved", "%"]), 10)
        + points(contains_any(&text, &["led", "managed", "team"]), 5);

    OverallBreakdown {
        skills,
        experience: experience.min(EXPERIENCE_CAP),
        education: education.min(EDUCATION_CAP),
        contact: contact.min(CONTACT_CAP),
        achievements: achievements.min(ACHIEVEMENTS_CAP),
    }
}

pub fn ats_breakdown(text: &str) -> AtsBreakdown {
    let text = text.to_lowercase();

    let found = ATS_KEYWORDS.iter().filter(|k| text.contains(*k)).count() as u32;
    let keywords = (found * 6).min(KEYWORDS_CAP);

    let structure = points(text.contains("experience") && text.contains("education"), 15)
        + points(contains_any(&text, &["skills", "technical"]), 10)
        + points(text.chars().count() > 500, 5);

    let format = points(!contains_any(&text, &["image", "graphic"]), 15)
        + points(FOUR_DIGIT_RE.is_match(&text), 10)
        + points(contains_any(&text, &["email", "@"]), 5);

    AtsBreakdown {
        keywords,
        structure: structure.min(STRUCTURE_CAP),
        format: format.min(FORMAT_CAP),
    }
}

/// Overall resume quality score in [0, 100].
pub fn overall_score(text: &str, skill_count: usize) -> u32 {
    clamp_score(overall_breakdown(text, skill_count).total() as f64)
}

/// ATS compatibility score in [0, 100].
pub fn ats_score(text: &str) -> u32 {
    clamp_score(ats_breakdown(text).total() as f64)
}
