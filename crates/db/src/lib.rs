//! Persistence layer: sqlx-postgres models and repositories for the five
//! triage-pipeline entities, plus idempotent startup migrations.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod models;
pub mod repo;

pub use repo::{AssignmentRepo, DecisionRepo, ExpertiseCacheRepo, SystemConfigRepo, UserRepo};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connection pool plus one repository handle per entity, the way a
/// production service wires persistence once at startup and clones cheap
/// handles into each component.
#[derive(Clone)]
pub struct Db {
    pub pool: PgPool,
    pub users: UserRepo,
    pub assignments: AssignmentRepo,
    pub expertise_cache: ExpertiseCacheRepo,
    pub decisions: DecisionRepo,
    pub system_config: SystemConfigRepo,
}

impl Db {
    /// Connect and apply pending migrations idempotently.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be established or a migration fails.
    /// Both are treated as fatal at startup.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self::from_pool(pool))
    }

    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            users: UserRepo::new(pool.clone()),
            assignments: AssignmentRepo::new(pool.clone()),
            expertise_cache: ExpertiseCacheRepo::new(pool.clone()),
            decisions: DecisionRepo::new(pool.clone()),
            system_config: SystemConfigRepo::new(pool.clone()),
            pool,
        }
    }
}
