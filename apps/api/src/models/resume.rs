use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a stored resume. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeStatus {
    Uploaded,
    Processing,
    Analyzed,
    Error,
}

impl ResumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeStatus::Uploaded => "uploaded",
            ResumeStatus::Processing => "processing",
            ResumeStatus::Analyzed => "analyzed",
            ResumeStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uploaded" => Some(ResumeStatus::Uploaded),
            "processing" => Some(ResumeStatus::Processing),
            "analyzed" => Some(ResumeStatus::Analyzed),
            "error" => Some(ResumeStatus::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_name: String,
    pub extracted_text: String,
    pub text_length: i32,
    pub status: String,
    pub analysis: Option<Value>,
    pub analysis_metadata: Option<Value>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn status(&self) -> Option<ResumeStatus> {
        ResumeStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    pub job_description_hash: String,
    pub match_score: i32,
    pub analysis: Value,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}
