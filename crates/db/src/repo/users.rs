use crate::models::UserMapping;
use crate::DbError;
use sqlx::PgPool;

#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up an active user mapping by git commit author email.
    ///
    /// Fail-open: callers treat an `Err` as "no mapping" and assume
    /// active, never as a reason to drop the developer from scoring.
    pub async fn find_by_git_email(
        &self,
        git_email: &str,
    ) -> Result<Option<UserMapping>, DbError> {
        sqlx::query_as::<_, UserMapping>(
            "SELECT id, git_email, chat_id, display_name, is_active, created_at, updated_at
             FROM users WHERE git_email = $1",
        )
        .bind(git_email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)
    }

    pub async fn find_by_chat_id(&self, chat_id: &str) -> Result<Option<UserMapping>, DbError> {
        sqlx::query_as::<_, UserMapping>(
            "SELECT id, git_email, chat_id, display_name, is_active, created_at, updated_at
             FROM users WHERE chat_id = $1",
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::from)
    }

    /// Upsert a user mapping. Prefers soft-deletion (`is_active = false`)
    /// over row removal elsewhere in the admin surface; this repo only
    /// exposes the read/write primitives the pipeline needs.
    pub async fn upsert(&self, mapping: &UserMapping) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO users (git_email, chat_id, display_name, is_active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (git_email) DO UPDATE
             SET chat_id = EXCLUDED.chat_id,
                 display_name = EXCLUDED.display_name,
                 is_active = EXCLUDED.is_active,
                 updated_at = now()",
        )
        .bind(&mapping.git_email)
        .bind(&mapping.chat_id)
        .bind(&mapping.display_name)
        .bind(mapping.is_active)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;
        Ok(())
    }
}
