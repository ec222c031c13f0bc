use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Duration as ChronoDuration;
use resilience::DegradationManager;
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

#[derive(Clone)]
struct HealthState {
    degradation: Arc<DegradationManager>,
}

/// Build the full HTTP router: webhook ingress plus the health surface,
/// the way `healer::ci::server::build_router` layers `TraceLayer` over a
/// single `Router::new().route(...)` chain.
pub fn build_router(ctx: &AppContext) -> Router {
    let webhook_state = webhook::AppState::new(
        ctx.settings.github_webhook_secret.clone(),
        ctx.db.decisions.clone(),
        ChronoDuration::from_std(ctx.settings.duplicate_detection_window).unwrap_or_else(|_| ChronoDuration::minutes(10)),
        ctx.job_sender.clone(),
    );

    let health_state = HealthState { degradation: ctx.degradation.clone() };

    let webhook_routes = webhook::routes().with_state(webhook_state);

    let health_routes = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/health/detailed", get(detailed_health_handler))
        .with_state(health_state);

    Router::new().merge(webhook_routes).merge(health_routes).layer(TraceLayer::new_for_http())
}

async fn root_handler() -> impl IntoResponse {
    Json(json!({"service": "triaged", "version": env!("CARGO_PKG_VERSION")}))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn detailed_health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let system_status = state.degradation.system_status().await;
    let services = state.degradation.service_statuses().await;

    #[derive(Serialize)]
    struct Detailed {
        status: &'static str,
        services: std::collections::HashMap<String, &'static str>,
    }

    let services = services.into_iter().map(|(name, level)| (name, level_label(level))).collect();

    Json(Detailed { status: level_label(system_status), services })
}

fn level_label(level: resilience::DegradationLevel) -> &'static str {
    match level {
        resilience::DegradationLevel::Normal => "normal",
        resilience::DegradationLevel::Degraded => "degraded",
        resilience::DegradationLevel::Critical => "critical",
        resilience::DegradationLevel::Offline => "offline",
    }
}
