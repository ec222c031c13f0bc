use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpertiseError {
    #[error("failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("git blame timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("git blame exited non-zero: {0}")]
    NonZeroExit(String),
    #[error(transparent)]
    Db(#[from] db::DbError),
}
