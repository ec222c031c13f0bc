use crate::DbError;
use config::ConfigStore;
use sqlx::PgPool;
use tracing::warn;

/// `system_config` is read-mostly; writes are last-writer-wins on `key`.
#[derive(Clone)]
pub struct SystemConfigRepo {
    pool: PgPool,
}

impl SystemConfigRepo {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, DbError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM system_config WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(v,)| v))
    }

    pub async fn set_raw(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO system_config (key, value, description)
             VALUES ($1, $2, $3)
             ON CONFLICT (key) DO UPDATE
             SET value = EXCLUDED.value, description = COALESCE(EXCLUDED.description, system_config.description), updated_at = now()",
        )
        .bind(key)
        .bind(value)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ConfigStore for SystemConfigRepo {
    async fn get(&self, key: &str) -> Option<String> {
        match self.get_raw(key).await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, key, "system_config read failed, treating as absent");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, description: Option<&str>) {
        if let Err(e) = self.set_raw(key, value, description).await {
            warn!(error = %e, key, "system_config write failed");
        }
    }
}
