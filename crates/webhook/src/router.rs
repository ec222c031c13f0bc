use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use db::DecisionRepo;
use serde_json::{json, Value};
use tokio::sync::mpsc::Sender;
use tracing::{debug, error, info, warn};

use crate::dedup;
use crate::types::{self, NormalizedRecord};

/// Shared state for the webhook route, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub webhook_secret: Option<String>,
    pub decisions: DecisionRepo,
    pub duplicate_window: Duration,
    pub queue: Sender<NormalizedRecord>,
}

impl AppState {
    #[must_use]
    pub fn new(webhook_secret: Option<String>, decisions: DecisionRepo, duplicate_window: Duration, queue: Sender<NormalizedRecord>) -> Self {
        Self { webhook_secret, decisions, duplicate_window, queue }
    }
}

/// `POST /webhook/github`: signature verification, event filtering,
/// duplicate suppression, and enqueue onto the triage job queue.
pub async fn handle_github_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let signature = headers.get("X-Hub-Signature-256").and_then(|v| v.to_str().ok());

    if !crate::signature::verify(&body, signature, state.webhook_secret.as_deref()) {
        warn!("rejecting webhook with invalid signature");
        return (StatusCode::UNAUTHORIZED, Json(json!({"status": "unauthorized"})));
    }

    let event_type = headers.get("X-GitHub-Event").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    let delivery_id = headers.get("X-GitHub-Delivery").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "invalid JSON payload");
            return (StatusCode::BAD_REQUEST, Json(json!({"status": "invalid_payload"})));
        }
    };

    info!(event_type, delivery_id, "received webhook");

    let record = match event_type.as_str() {
        "issues" => types::parse_issue_event(&payload),
        "pull_request" => types::parse_pull_request_event(&payload),
        other => {
            debug!(event_type = other, "ignoring unsupported event type");
            None
        }
    };

    let Some(record) = record else {
        return (StatusCode::OK, Json(json!({"status": "ignored"})));
    };

    if dedup::is_duplicate(&state.decisions, &record.issue_id, state.duplicate_window).await {
        info!(issue_id = %record.issue_id, "duplicate detected, skipping triage");
        return (StatusCode::OK, Json(json!({"status": "duplicate", "issue_id": record.issue_id})));
    }

    advisory_similarity_check(&state, &record).await;

    if state.queue.send(record.clone()).await.is_err() {
        error!("triage job queue is closed, dropping record");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"status": "error"})));
    }

    (StatusCode::OK, Json(json!({"status": "accepted", "issue_id": record.issue_id})))
}

/// Best-effort: warns when the new body shares at least half its keywords
/// with a recently-seen stack trace. Never blocks ingestion.
async fn advisory_similarity_check(state: &AppState, record: &NormalizedRecord) {
    let Ok(recent) = state.decisions.recent(Utc::now() - state.duplicate_window).await else {
        return;
    };

    for decision in &recent {
        if let Some(stack_trace) = decision.stack_trace.as_deref() {
            if dedup::is_similar(&record.body, stack_trace) {
                warn!(
                    issue_id = %record.issue_id,
                    similar_to = decision.issue_id,
                    "advisory: new issue content is similar to a recent decision"
                );
                return;
            }
        }
    }
}
