use crate::models::TriageDecisionRow;
use crate::DbError;
use sqlx::PgPool;

#[derive(Clone)]
pub struct DecisionRepo {
    pool: PgPool,
}

impl DecisionRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append-only insert. `TriageDecision.issue_id` is append-only by
    /// design: this repo exposes no update or delete path.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        issue_id: &str,
        stack_trace: Option<&str>,
        affected_files: &[String],
        root_cause: Option<&str>,
        confidence: f64,
        draft_pr_url: Option<&str>,
        processing_time_ms: i64,
    ) -> Result<TriageDecisionRow, DbError> {
        let affected_files = serde_json::to_value(affected_files).unwrap_or_default();
        sqlx::query_as::<_, TriageDecisionRow>(
            "INSERT INTO triage_decisions
                (issue_id, stack_trace, affected_files, root_cause, confidence, draft_pr_url, processing_time_ms)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, issue_id, stack_trace, affected_files, root_cause, confidence,
                       draft_pr_url, processing_time_ms, created_at",
        )
        .bind(issue_id)
        .bind(stack_trace)
        .bind(affected_files)
        .bind(root_cause)
        .bind(confidence.clamp(0.0, 100.0))
        .bind(draft_pr_url)
        .bind(processing_time_ms)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Most recent decision for an issue, used by the webhook ingress
    /// route's dedup-suppression and content-similarity checks.
    pub async fn most_recent_for_issue(
        &self,
        issue_id: &str,
    ) -> Result<Option<TriageDecisionRow>, DbError> {
        sqlx::query_as::<_, TriageDecisionRow>(
            "SELECT id, issue_id, stack_trace, affected_files, root_cause, confidence,
                    draft_pr_url, processing_time_ms, created_at
             FROM triage_decisions WHERE issue_id = $1
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(issue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Decisions created within the window, across all issues, used by the
    /// advisory content-similarity check.
    pub async fn recent(&self, since: chrono::DateTime<chrono::Utc>) -> Result<Vec<TriageDecisionRow>, DbError> {
        sqlx::query_as::<_, TriageDecisionRow>(
            "SELECT id, issue_id, stack_trace, affected_files, root_cause, confidence,
                    draft_pr_url, processing_time_ms, created_at
             FROM triage_decisions WHERE created_at >= $1
             ORDER BY created_at DESC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)
    }
}
