use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::analysis::normalize::{ensure_sufficient_content, normalize_text};
use crate::errors::AppError;
use crate::models::page::{Page, PageInfo, PageQuery};
use crate::models::resume::{ResumeRow, ResumeStatus};
use crate::resumes::lifecycle::spawn_analysis;
use crate::resumes::store::ResumeSummaryRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .into()
    }
}

#[derive(Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub original_name: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct ResumeCreatedResponse {
    pub id: Uuid,
    pub original_name: String,
    pub status: String,
    pub text_length: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeSummaryRow>,
    pub pagination: PageInfo,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub resume_id: Uuid,
    pub status: String,
    pub analysis: Option<Value>,
    pub metadata: Option<Value>,
    pub error_message: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for AnalysisResponse {
    fn from(row: ResumeRow) -> Self {
        AnalysisResponse {
            resume_id: row.id,
            status: row.status,
            analysis: row.analysis,
            metadata: row.analysis_metadata,
            error_message: row.error_message,
            updated_at: row.updated_at,
        }
    }
}

fn resume_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeCreatedResponse>), AppError> {
    let original_name = req.original_name.trim();
    if original_name.is_empty() {
        return Err(AppError::Validation("original_name must not be empty".to_string()));
    }

    let text = normalize_text(&req.text);
    ensure_sufficient_content(&text)?;

    let row = state
        .resumes
        .insert(req.user_id, original_name, &text)
        .await?;
    info!(resume_id = %row.id, text_length = row.text_length, "Resume stored");

    Ok((
        StatusCode::CREATED,
        Json(ResumeCreatedResponse {
            id: row.id,
            original_name: row.original_name,
            status: row.status,
            text_length: row.text_length,
            created_at: row.created_at,
        }),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let page = params.page();
    let (resumes, total) = state.resumes.list(params.user_id, page).await?;
    let pagination = page.info(resumes.len(), total);
    Ok(Json(ResumeListResponse {
        resumes,
        pagination,
    }))
}

/// POST /api/v1/resumes/:id/analyze
/// Returns the stored analysis when one exists; 409 while another run holds the claim.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let resume = state
        .resumes
        .get(id, params.user_id)
        .await?
        .ok_or_else(|| resume_not_found(id))?;

    if resume.status() == Some(ResumeStatus::Analyzed) && resume.analysis.is_some() {
        info!(resume_id = %id, "Returning stored analysis");
        return Ok(Json(resume.into()));
    }

    let row = spawn_analysis(
        state.resumes.clone(),
        state.analyzer.clone(),
        id,
        params.user_id,
    )
    .await?;
    Ok(Json(row.into()))
}

/// GET /api/v1/resumes/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let resume = state
        .resumes
        .get(id, params.user_id)
        .await?
        .ok_or_else(|| resume_not_found(id))?;
    Ok(Json(resume.into()))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !state.resumes.delete(id, params.user_id).await? {
        return Err(resume_not_found(id));
    }
    info!(resume_id = %id, "Resume deleted");
    Ok(StatusCode::NO_CONTENT)
}
