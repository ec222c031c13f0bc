use crate::models::{AssignmentRow, AssignmentStatus};
use crate::DbError;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AssignmentRepo {
    pool: PgPool,
}

impl AssignmentRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an `assigned` row. Called only for auto-assigned decisions —
    /// route-to-human outcomes are never recorded here.
    pub async fn create(
        &self,
        issue_id: &str,
        issue_url: &str,
        assignee_email: &str,
        confidence: f64,
        reasoning: &str,
    ) -> Result<AssignmentRow, DbError> {
        let confidence = confidence.clamp(0.0, 100.0);
        sqlx::query_as::<_, AssignmentRow>(
            "INSERT INTO assignments (issue_id, issue_url, assignee_email, confidence, reasoning, status)
             VALUES ($1, $2, $3, $4, $5, 'assigned')
             RETURNING id, issue_id, issue_url, assignee_email, confidence, reasoning, status, created_at, updated_at",
        )
        .bind(issue_id)
        .bind(issue_url)
        .bind(assignee_email)
        .bind(confidence)
        .bind(reasoning)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Count of currently-active assignments for a developer, used as a
    /// workload input to assignment scoring.
    pub async fn active_count(&self, assignee_email: &str) -> Result<i64, DbError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM assignments WHERE assignee_email = $1 AND status = 'assigned'",
        )
        .bind(assignee_email)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(row.0)
    }

    /// Loop-prevention check: has `(issue_id, candidate_email)` already been assigned?
    pub async fn already_assigned(
        &self,
        issue_id: &str,
        candidate_email: &str,
    ) -> Result<bool, DbError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM assignments WHERE issue_id = $1 AND assignee_email = $2",
        )
        .bind(issue_id)
        .bind(candidate_email)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(row.0 > 0)
    }

    /// Mark a prior assignment as reassigned. The new assignment is a
    /// separate row created via `create`.
    pub async fn mark_reassigned(&self, assignment_id: i64) -> Result<(), DbError> {
        sqlx::query("UPDATE assignments SET status = $1, updated_at = now() WHERE id = $2")
            .bind(AssignmentStatus::Reassigned.as_str())
            .bind(assignment_id)
            .execute(&self.pool)
            .await
            .map_err(DbError::from)?;
        Ok(())
    }
}
