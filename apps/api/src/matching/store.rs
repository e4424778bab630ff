//! Job-match persistence. At most one record exists per
//! `(resume_id, job_description_hash)`; the Postgres store enforces it with a
//! unique constraint so concurrent submissions cannot both insert.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::page::Page;
use crate::models::resume::JobMatchRow;

#[derive(Debug, Clone)]
pub struct NewJobMatch {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub job_description_hash: String,
    pub match_score: i32,
    pub analysis: Value,
    pub metadata: Value,
}

/// `created` is false when another writer already holds the key; `record`
/// is then that writer's row.
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    pub record: JobMatchRow,
    pub created: bool,
}

#[async_trait]
pub trait JobMatchStore: Send + Sync {
    async fn find(
        &self,
        resume_id: Uuid,
        job_description_hash: &str,
    ) -> Result<Option<JobMatchRow>, sqlx::Error>;

    async fn insert_if_absent(&self, new: NewJobMatch) -> Result<InsertOutcome, sqlx::Error>;

    /// Newest first, plus the total count for the resume.
    async fn list_for_resume(
        &self,
        resume_id: Uuid,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<JobMatchRow>, i64), sqlx::Error>;
}

pub struct PgJobMatchStore {
    db: PgPool,
}

impl PgJobMatchStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobMatchStore for PgJobMatchStore {
    async fn find(
        &self,
        resume_id: Uuid,
        job_description_hash: &str,
    ) -> Result<Option<JobMatchRow>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM job_matches WHERE resume_id = $1 AND job_description_hash = $2",
        )
        .bind(resume_id)
        .bind(job_description_hash)
        .fetch_optional(&self.db)
        .await
    }

    async fn insert_if_absent(&self, new: NewJobMatch) -> Result<InsertOutcome, sqlx::Error> {
        let inserted: Option<JobMatchRow> = sqlx::query_as(
            r#"
            INSERT INTO job_matches
                (user_id, resume_id, job_title, company, job_description,
                 job_description_hash, match_score, analysis, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (resume_id, job_description_hash) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.resume_id)
        .bind(&new.job_title)
        .bind(&new.company)
        .bind(&new.job_description)
        .bind(&new.job_description_hash)
        .bind(new.match_score)
        .bind(&new.analysis)
        .bind(&new.metadata)
        .fetch_optional(&self.db)
        .await?;

        if let Some(record) = inserted {
            return Ok(InsertOutcome {
                record,
                created: true,
            });
        }

        // Conflict: the first writer's row is committed and visible now.
        let record = self
            .find(new.resume_id, &new.job_description_hash)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        Ok(InsertOutcome {
            record,
            created: false,
        })
    }

    async fn list_for_resume(
        &self,
        resume_id: Uuid,
        user_id: Uuid,
        page: Page,
    ) -> Result<(Vec<JobMatchRow>, i64), sqlx::Error> {
        let rows: Vec<JobMatchRow> = sqlx::query_as(
            r#"
            SELECT * FROM job_matches
            WHERE resume_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(resume_id)
        .bind(user_id)
        .bind(page.limit as i64)
        .bind(page.offset())
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM job_matches WHERE resume_id = $1 AND user_id = $2",
        )
        .bind(resume_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok((rows, total))
    }
}
