use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::matching::service::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InsufficientContent { .. } => AppError::Validation(err.to_string()),
            AnalysisError::LlmResponseMalformed(_) | AnalysisError::LlmProvider(_) => {
                AppError::Llm(err.to_string())
            }
        }
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::JobDescriptionTooShort { .. } | MatchError::JobDescriptionUnreadable => {
                AppError::Validation(err.to_string())
            }
            MatchError::Analysis(e) => e.into(),
            MatchError::Store(e) => AppError::Database(e),
            MatchError::Serialization(e) => AppError::Internal(e.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_short_content_maps_to_bad_request() {
        let err: AppError = AnalysisError::InsufficientContent {
            length: 10,
            minimum: 50,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_failures_map_to_server_error() {
        let err: AppError = AnalysisError::LlmProvider(LlmError::EmptyContent).into();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_match_errors_map_by_kind() {
        let short: AppError = MatchError::JobDescriptionTooShort {
            length: 49,
            minimum: 50,
        }
        .into();
        assert!(matches!(short, AppError::Validation(_)));

        let unreadable: AppError = MatchError::JobDescriptionUnreadable.into();
        assert!(matches!(unreadable, AppError::Validation(_)));

        let store: AppError = MatchError::Store(sqlx::Error::RowNotFound).into();
        assert!(matches!(store, AppError::Database(_)));
    }

    #[test]
    fn test_conflict_status() {
        let response = AppError::Conflict("busy".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
