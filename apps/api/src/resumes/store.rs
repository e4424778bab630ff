//! Resume persistence behind the `ResumeStore` seam. The analysis lifecycle
//! moves a row `uploaded -> processing -> analyzed | error`; the only way into
//! `processing` is the conditional claim, so two requests cannot both run.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::page::Page;
use crate::models::resume::{ResumeRow, ResumeStatus};

/// List projection: no text, scores lifted out of the analysis document.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeSummaryRow {
    pub id: Uuid,
    pub original_name: String,
    pub status: String,
    pub overall_score: Option<i32>,
    pub ats_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn insert(
        &self,
        user_id: Uuid,
        original_name: &str,
        extracted_text: &str,
    ) -> Result<ResumeRow, sqlx::Error>;

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error>;

    /// Newest first, plus the user's total count.
    async fn list(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<ResumeSummaryRow>, i64), sqlx::Error>;

    /// Moves the row to `processing` if it is `uploaded`, `error`, or a
    /// `processing` claim last touched before `stale_before`. `None` when the
    /// row is missing or a live claim or finished analysis holds it.
    async fn claim_for_analysis(
        &self,
        id: Uuid,
        user_id: Uuid,
        stale_before: DateTime<Utc>,
    ) -> Result<Option<ResumeRow>, sqlx::Error>;

    /// Writes the whole analysis in one statement; readers never see a partial record.
    async fn save_analysis(
        &self,
        id: Uuid,
        analysis: &Value,
        metadata: &Value,
    ) -> Result<ResumeRow, sqlx::Error>;

    async fn mark_failed(&self, id: Uuid, message: &str) -> Result<(), sqlx::Error>;

    /// Job matches go with it. False when nothing was deleted.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error>;
}

pub struct PgResumeStore {
    db: PgPool,
}

impl PgResumeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert(
        &self,
        user_id: Uuid,
        original_name: &str,
        extracted_text: &str,
    ) -> Result<ResumeRow, sqlx::Error> {
        sqlx::query_as(
            r#"
            INSERT INTO resumes (user_id, original_name, extracted_text, text_length, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(original_name)
        .bind(extracted_text)
        .bind(extracted_text.chars().count() as i32)
        .bind(ResumeStatus::Uploaded.as_str())
        .fetch_one(&self.db)
        .await
    }

    async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
    }

    async fn list(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<ResumeSummaryRow>, i64), sqlx::Error> {
        let rows: Vec<ResumeSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, original_name, status,
                   (analysis->>'overallScore')::int AS overall_score,
                   (analysis->>'atsScore')::int AS ats_score,
                   created_at
            FROM resumes
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit as i64)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        Ok((rows, total))
    }

    async fn claim_for_analysis(
        &self,
        id: Uuid,
        user_id: Uuid,
        stale_before: DateTime<Utc>,
    ) -> Result<Option<ResumeRow>, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE resumes
            SET status = 'processing', error_message = NULL, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
              AND (status IN ('uploaded', 'error')
                   OR (status = 'processing' AND updated_at < $3))
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(stale_before)
        .fetch_optional(&self.db)
        .await
    }

    async fn save_analysis(
        &self,
        id: Uuid,
        analysis: &Value,
        metadata: &Value,
    ) -> Result<ResumeRow, sqlx::Error> {
        sqlx::query_as(
            r#"
            UPDATE resumes
            SET status = 'analyzed', analysis = $2, analysis_metadata = $3,
                error_message = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(analysis)
        .bind(metadata)
        .fetch_one(&self.db)
        .await
    }

    async fn mark_failed(&self, id: Uuid, message: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE resumes SET status = 'error', error_message = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(message)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        // job_matches rows follow via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
