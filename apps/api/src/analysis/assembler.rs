//! Heuristic analysis assembler: matcher output + scores → `RawAnalysis`.
//!
//! Rule lists here may come out empty; fallbacks are applied by
//! `sanitize::finalize_analysis`, shared with the LLM path.

use crate::analysis::matcher::{extract_total_years, keyword_density, KeywordMatcher};
use crate::analysis::sanitize::{RawAnalysis, RawSkill};
use crate::analysis::scoring::{ats_score, overall_score};
use crate::models::analysis::ExperienceLevel;

/// Builds the heuristic record for already-normalized text.
pub fn assemble_heuristic(text: &str, matcher: &KeywordMatcher) -> RawAnalysis {
    let found = matcher.find_skills(text);
    let overall = overall_score(text, found.len());
    let ats = ats_score(text);

    // Unknown tenure is recorded as 0 years rather than guessed.
    let total_years = extract_total_years(text).unwrap_or(0.0);

    let technical_skills = found
        .iter()
        .map(|skill| RawSkill {
            name: skill.display.to_string(),
            category: Some(skill.category),
            proficiency: Some(matcher.proficiency(text, skill.term)),
            years_of_experience: Some(total_years),
        })
        .collect();

    let job_roles = matcher.job_roles(text);

    RawAnalysis {
        technical_skills,
        soft_skills: matcher.soft_skills(text),
        total_years: Some(total_years),
        level: Some(ExperienceLevel::from_years(total_years)),
        roles: job_roles.clone(),
        companies: Vec::new(),
        education: matcher.education(text),
        job_roles,
        overall_score: Some(overall as f64),
        ats_score: Some(ats as f64),
        suggestions: suggestions(text, overall, ats),
        strengths: strengths(text, found.len()),
        weaknesses: weaknesses(text, overall, ats),
        keyword_density: keyword_density(text)
            .into_iter()
            .map(|(k, v)| (k, v as f64))
            .collect(),
    }
}

fn suggestions(text: &str, overall: u32, ats: u32) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut suggestions = Vec::new();

    if overall < 70 {
        suggestions.push("Add more specific technical skills and achievements".to_string());
    }
    if ats < 70 {
        suggestions.push("Improve keyword optimization for ATS systems".to_string());
    }
    if !lower.contains("project") {
        suggestions.push("Include relevant project experience".to_string());
    }
    if !lower.contains('%') && !lower.contains("increase") {
        suggestions.push("Add quantifiable achievements with metrics".to_string());
    }
    suggestions
}

fn strengths(text: &str, skill_count: usize) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut strengths = Vec::new();

    if skill_count > 5 {
        strengths.push("Strong technical skill set".to_string());
    }
    if lower.contains("lead") || lower.contains("manage") {
        strengths.push("Leadership experience".to_string());
    }
    if lower.contains("project") {
        strengths.push("Project experience".to_string());
    }
    strengths
}

fn weaknesses(text: &str, overall: u32, ats: u32) -> Vec<String> {
    let mut weaknesses = Vec::new();

    if overall < 60 {
        weaknesses.push("Could benefit from more detailed experience descriptions".to_string());
    }
    if ats < 60 {
        weaknesses.push("Needs better keyword optimization".to_string());
    }
    if !text.contains('@') {
        weaknesses.push("Missing contact information".to_string());
    }
    weaknesses
}
