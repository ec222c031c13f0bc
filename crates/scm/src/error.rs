use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("source host returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid repository identifier: {0}")]
    InvalidRepository(String),
    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),
}
