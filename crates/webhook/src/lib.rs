//! GitHub webhook ingress: HMAC signature verification, `issues`/
//! `pull_request` event filtering, duplicate suppression, and enqueue
//! onto the in-process triage job queue.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod dedup;
mod router;
mod signature;
mod types;

pub use router::{handle_github_webhook, AppState};
pub use types::{parse_issue_event, parse_pull_request_event, NormalizedRecord, RecordType};

use axum::routing::post;
use axum::Router;

/// Build the `/webhook/github` route for mounting into the application
/// router, the way `input-bridge`'s `main` composes its `Router`.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new().route("/webhook/github", post(handle_github_webhook))
}
