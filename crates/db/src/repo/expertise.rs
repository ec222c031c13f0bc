use crate::models::ExpertiseCacheRow;
use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Clone)]
pub struct ExpertiseCacheRepo {
    pool: PgPool,
}

impl ExpertiseCacheRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_for_file(&self, file_path: &str) -> Result<Vec<ExpertiseCacheRow>, DbError> {
        sqlx::query_as::<_, ExpertiseCacheRow>(
            "SELECT id, file_path, developer_email, score, commit_count, last_commit_date,
                    lines_owned, calculated_at
             FROM expertise_cache WHERE file_path = $1",
        )
        .bind(file_path)
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Replace all cached rows for a file atomically (delete-then-insert in
    /// one transaction), used on a cache-miss recompute.
    pub async fn replace_for_file(
        &self,
        file_path: &str,
        rows: &[ExpertiseCacheRow],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM expertise_cache WHERE file_path = $1")
            .bind(file_path)
            .execute(&mut *tx)
            .await?;

        for row in rows {
            sqlx::query(
                "INSERT INTO expertise_cache
                    (file_path, developer_email, score, commit_count, last_commit_date, lines_owned, calculated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, now())",
            )
            .bind(file_path)
            .bind(&row.developer_email)
            .bind(row.score)
            .bind(row.commit_count)
            .bind(row.last_commit_date)
            .bind(row.lines_owned)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// True when `calculated_at` is within the 24h TTL of `now`.
    #[must_use]
    pub fn is_fresh(calculated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(calculated_at) < chrono::Duration::hours(24)
    }
}
