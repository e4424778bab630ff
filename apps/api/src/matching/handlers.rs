use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::service::{find_or_create_match, validate_job_description, MatchRequest};
use crate::models::analysis::ResumeAnalysis;
use crate::models::page::PageInfo;
use crate::models::resume::{JobMatchRow, ResumeStatus};
use crate::resumes::handlers::{ListQuery, UserIdQuery};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateMatchRequest {
    pub job_description: String,
    pub job_title: Option<String>,
    pub company: Option<String>,
}

#[derive(Serialize)]
pub struct JobMatchResponse {
    /// True when the stored result for this description was returned.
    pub replayed: bool,
    #[serde(rename = "match")]
    pub job_match: JobMatchRow,
}

#[derive(Serialize)]
pub struct JobMatchSummary {
    pub id: Uuid,
    pub job_title: String,
    pub company: String,
    pub match_score: i32,
    pub strengths: Value,
    pub weaknesses: Value,
    pub created_at: DateTime<Utc>,
}

impl From<JobMatchRow> for JobMatchSummary {
    fn from(row: JobMatchRow) -> Self {
        JobMatchSummary {
            id: row.id,
            job_title: row.job_title,
            company: row.company,
            match_score: row.match_score,
            strengths: row.analysis.get("strengths").cloned().unwrap_or(Value::Null),
            weaknesses: row.analysis.get("weaknesses").cloned().unwrap_or(Value::Null),
            created_at: row.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct JobMatchListResponse {
    pub matches: Vec<JobMatchSummary>,
    pub pagination: PageInfo,
}

/// POST /api/v1/resumes/:id/job-matches
/// 201 when a new match was computed, 200 when a stored one is replayed.
pub async fn handle_create_job_match(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<JobMatchResponse>), AppError> {
    validate_job_description(&req.job_description)?;

    let resume = state
        .resumes
        .get(resume_id, params.user_id)
        .await?
        .filter(|r| r.status() == Some(ResumeStatus::Analyzed))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Resume {resume_id} not found or not analyzed; analyze it before job matching"
            ))
        })?;
    let stored = resume.analysis.clone().ok_or_else(|| {
        AppError::NotFound(format!("Resume {resume_id} has no stored analysis"))
    })?;
    let analysis: ResumeAnalysis = serde_json::from_value(stored).map_err(anyhow::Error::from)?;

    let outcome = find_or_create_match(
        state.match_store.as_ref(),
        state.job_matcher.as_ref(),
        MatchRequest {
            user_id: params.user_id,
            resume_id,
            resume: &analysis,
            resume_text: &resume.extracted_text,
            job_description: &req.job_description,
            job_title: req.job_title.as_deref(),
            company: req.company.as_deref(),
        },
    )
    .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(JobMatchResponse {
            replayed: !outcome.created,
            job_match: outcome.record,
        }),
    ))
}

/// GET /api/v1/resumes/:id/job-matches
pub async fn handle_list_job_matches(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<ListQuery>,
) -> Result<Json<JobMatchListResponse>, AppError> {
    let page = params.page();
    let (rows, total) = state
        .match_store
        .list_for_resume(resume_id, params.user_id, page)
        .await?;
    let pagination = page.info(rows.len(), total);
    Ok(Json(JobMatchListResponse {
        matches: rows.into_iter().map(JobMatchSummary::from).collect(),
        pagination,
    }))
}
