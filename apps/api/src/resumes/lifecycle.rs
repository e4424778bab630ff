//! Claim, analyze, then store the whole analysis or the failure message.
//!
//! `spawn_analysis` runs the sequence on its own task, so a dropped request
//! (client disconnect, proxy timeout) cannot leave the claim half finished.
//! A claim whose task died anyway goes stale after [`STALE_CLAIM_SECS`] and
//! can be taken again.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::{run_analysis, AnalysisOutcome, ResumeAnalyzer};
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::store::ResumeStore;

/// Longer than the LLM client's worst case of three 120 s attempts plus backoff.
pub const STALE_CLAIM_SECS: i64 = 15 * 60;

fn busy() -> AppError {
    AppError::Conflict("Resume is currently being analyzed".to_string())
}

pub async fn spawn_analysis(
    store: Arc<dyn ResumeStore>,
    analyzer: Arc<dyn ResumeAnalyzer>,
    id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    tokio::spawn(analyze_resume(store, analyzer, id, user_id))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("analysis task failed: {e}")))?
}

pub async fn analyze_resume(
    store: Arc<dyn ResumeStore>,
    analyzer: Arc<dyn ResumeAnalyzer>,
    id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let stale_before = Utc::now() - Duration::seconds(STALE_CLAIM_SECS);
    let claimed = store
        .claim_for_analysis(id, user_id, stale_before)
        .await?
        .ok_or_else(busy)?;
    info!(resume_id = %id, backend = analyzer.backend(), "Resume claimed for analysis");

    let outcome = match run_analysis(analyzer.as_ref(), &claimed.extracted_text).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(resume_id = %id, error = %e, "Resume analysis failed");
            record_failure(store.as_ref(), id, &e.to_string()).await;
            return Err(e.into());
        }
    };

    match save(store.as_ref(), id, &outcome).await {
        Ok(row) => Ok(row),
        Err(e) => {
            error!(resume_id = %id, error = %e, "Storing resume analysis failed");
            record_failure(store.as_ref(), id, "Analysis could not be stored").await;
            Err(e)
        }
    }
}

async fn save(
    store: &dyn ResumeStore,
    id: Uuid,
    outcome: &AnalysisOutcome,
) -> Result<ResumeRow, AppError> {
    let analysis = serde_json::to_value(&outcome.analysis).map_err(anyhow::Error::from)?;
    let metadata = serde_json::to_value(&outcome.metadata).map_err(anyhow::Error::from)?;
    Ok(store.save_analysis(id, &analysis, &metadata).await?)
}

/// Best effort: if this write fails too, the claim is recovered once stale.
async fn record_failure(store: &dyn ResumeStore, id: Uuid, message: &str) {
    if let Err(e) = store.mark_failed(id, message).await {
        warn!(resume_id = %id, error = %e, "Could not record analysis failure");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{HeuristicAnalyzer, LlmAnalyzer};
    use crate::llm_client::fake::ScriptedLlm;
    use crate::models::resume::ResumeStatus;
    use crate::resumes::store::memory::MemoryResumeStore;

    const TEXT: &str = "Senior engineer with 6 years of experience building react and node \
        services. Led a project team and increased throughput by 30%. Contact: me@mail.com";

    async fn seeded() -> (Arc<MemoryResumeStore>, ResumeRow) {
        let store = Arc::new(MemoryResumeStore::default());
        let row = store.insert(Uuid::nil(), "cv.pdf", TEXT).await.unwrap();
        (store, row)
    }

    fn heuristic() -> Arc<dyn ResumeAnalyzer> {
        Arc::new(HeuristicAnalyzer::default())
    }

    #[tokio::test]
    async fn test_success_stores_whole_analysis() {
        let (store, row) = seeded().await;
        let saved = analyze_resume(store.clone(), heuristic(), row.id, row.user_id)
            .await
            .unwrap();

        assert_eq!(saved.status(), Some(ResumeStatus::Analyzed));
        let stored = store.row(row.id).unwrap();
        assert!(stored.analysis.is_some());
        assert_eq!(stored.analysis_metadata.unwrap()["backend"], "heuristic");
        assert_eq!(stored.error_message, None);
    }

    #[tokio::test]
    async fn test_malformed_reply_stores_error_without_analysis() {
        let (store, row) = seeded().await;
        let analyzer = Arc::new(LlmAnalyzer::new(Arc::new(ScriptedLlm::text("no json here"))));

        let err = analyze_resume(store.clone(), analyzer, row.id, row.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));

        let stored = store.row(row.id).unwrap();
        assert_eq!(stored.status(), Some(ResumeStatus::Error));
        assert!(stored.error_message.unwrap().contains("Malformed"));
        assert_eq!(stored.analysis, None);
    }

    #[tokio::test]
    async fn test_failed_save_still_records_error() {
        let (store, row) = seeded().await;
        store.fail_saves();

        let err = analyze_resume(store.clone(), heuristic(), row.id, row.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));

        let stored = store.row(row.id).unwrap();
        assert_eq!(stored.status(), Some(ResumeStatus::Error));
        assert!(stored.error_message.is_some());
        assert_eq!(stored.analysis, None);
    }

    #[tokio::test]
    async fn test_live_claim_conflicts() {
        let (store, row) = seeded().await;
        let stale_before = Utc::now() - Duration::seconds(STALE_CLAIM_SECS);
        store
            .claim_for_analysis(row.id, row.user_id, stale_before)
            .await
            .unwrap()
            .unwrap();

        let err = analyze_resume(store.clone(), heuristic(), row.id, row.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.row(row.id).unwrap().status(), Some(ResumeStatus::Processing));
    }

    #[tokio::test]
    async fn test_stale_claim_is_recovered() {
        let (store, row) = seeded().await;
        let stale_before = Utc::now() - Duration::seconds(STALE_CLAIM_SECS);
        store
            .claim_for_analysis(row.id, row.user_id, stale_before)
            .await
            .unwrap()
            .unwrap();
        store.backdate(row.id, Duration::seconds(STALE_CLAIM_SECS + 60));

        let saved = analyze_resume(store.clone(), heuristic(), row.id, row.user_id)
            .await
            .unwrap();
        assert_eq!(saved.status(), Some(ResumeStatus::Analyzed));
    }

    #[tokio::test]
    async fn test_error_status_can_be_retried() {
        let (store, row) = seeded().await;
        let failing = Arc::new(LlmAnalyzer::new(Arc::new(ScriptedLlm::api_error(500, "down"))));
        assert!(analyze_resume(store.clone(), failing, row.id, row.user_id)
            .await
            .is_err());

        let saved = analyze_resume(store.clone(), heuristic(), row.id, row.user_id)
            .await
            .unwrap();
        assert_eq!(saved.status(), Some(ResumeStatus::Analyzed));
        assert_eq!(saved.error_message, None);
    }
}
