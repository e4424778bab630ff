//! Idempotent job matching: one stored result per resume and job description.
//!
//! The key is the SHA-256 of the normalized, lowercased description, so
//! whitespace or case edits replay the stored match instead of recomputing.

use std::time::Instant;

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::normalize::normalize_text;
use crate::analysis::AnalysisError;
use crate::matching::job_matcher::JobMatcher;
use crate::matching::store::{JobMatchStore, NewJobMatch};
use crate::models::analysis::{AnalysisMetadata, ResumeAnalysis};
use crate::models::resume::JobMatchRow;

pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;
pub const DEFAULT_JOB_TITLE: &str = "Untitled Position";

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Job description must be at least {minimum} characters long (got {length})")]
    JobDescriptionTooShort { length: usize, minimum: usize },

    #[error("Job description has no readable text after normalization")]
    JobDescriptionUnreadable,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Job match store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Rejects descriptions under 50 characters after trimming, and ones that
/// normalize to nothing (they would all share one key).
pub fn validate_job_description(text: &str) -> Result<(), MatchError> {
    let length = text.trim().chars().count();
    if length < MIN_JOB_DESCRIPTION_CHARS {
        return Err(MatchError::JobDescriptionTooShort {
            length,
            minimum: MIN_JOB_DESCRIPTION_CHARS,
        });
    }
    if normalize_text(text).is_empty() {
        return Err(MatchError::JobDescriptionUnreadable);
    }
    Ok(())
}

/// Lowercase hex SHA-256 of the normalized, lowercased description.
pub fn job_description_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_text(text).to_lowercase().as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct MatchRequest<'a> {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub resume: &'a ResumeAnalysis,
    pub resume_text: &'a str,
    pub job_description: &'a str,
    pub job_title: Option<&'a str>,
    pub company: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub record: JobMatchRow,
    /// False when a stored match was returned instead of a new one.
    pub created: bool,
}

pub async fn find_or_create_match(
    store: &dyn JobMatchStore,
    matcher: &dyn JobMatcher,
    request: MatchRequest<'_>,
) -> Result<MatchOutcome, MatchError> {
    validate_job_description(request.job_description)?;
    let hash = job_description_hash(request.job_description);

    if let Some(record) = store.find(request.resume_id, &hash).await? {
        info!(
            resume_id = %request.resume_id,
            match_id = %record.id,
            "Job match replayed from store"
        );
        return Ok(MatchOutcome {
            record,
            created: false,
        });
    }

    let started = Instant::now();
    let job_description = request.job_description.trim();
    let analysis = matcher
        .compare(request.resume, request.resume_text, job_description)
        .await?;
    let metadata = AnalysisMetadata {
        processing_time_ms: started.elapsed().as_millis() as u64,
        backend: matcher.backend().to_string(),
        confidence: matcher.confidence(),
    };

    let new = NewJobMatch {
        user_id: request.user_id,
        resume_id: request.resume_id,
        job_title: non_blank(request.job_title).unwrap_or(DEFAULT_JOB_TITLE).to_string(),
        company: non_blank(request.company).unwrap_or_default().to_string(),
        job_description: job_description.to_string(),
        job_description_hash: hash,
        match_score: analysis.match_score as i32,
        analysis: serde_json::to_value(&analysis)?,
        metadata: serde_json::to_value(&metadata)?,
    };

    let outcome = store.insert_if_absent(new).await?;
    if outcome.created {
        info!(
            resume_id = %request.resume_id,
            match_id = %outcome.record.id,
            match_score = outcome.record.match_score,
            processing_time_ms = metadata.processing_time_ms,
            backend = %metadata.backend,
            "Job match created"
        );
    } else {
        warn!(
            resume_id = %request.resume_id,
            match_id = %outcome.record.id,
            "Concurrent job match lost the insert race; returning the stored record"
        );
    }

    Ok(MatchOutcome {
        record: outcome.record,
        created: outcome.created,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
