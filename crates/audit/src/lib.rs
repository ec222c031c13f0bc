//! Decision logger: one append-only `TriageDecision` row per job plus a
//! general-purpose structured system-event channel, grounded on
//! `original_source/backend/error_handling.py`'s `ComprehensiveLogger`.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use chrono::Utc;
use db::models::TriageDecisionRow;
use db::DecisionRepo;
use serde_json::Value;
use tracing::{error, info, warn};

/// Severity for [`AuditLog::log_system_event`]. `Critical` logs at
/// `tracing::error!` with an extra field since `tracing` has no level
/// above `ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Warning,
    Error,
    Critical,
}

/// `triage_<issue_id>_<unix_timestamp>`, the correlation id threaded
/// through every log line for one job.
#[must_use]
pub fn correlation_id(issue_id: &str) -> String {
    format!("triage_{issue_id}_{}", Utc::now().timestamp())
}

pub struct AuditLog {
    decisions: DecisionRepo,
}

impl AuditLog {
    #[must_use]
    pub fn new(decisions: DecisionRepo) -> Self {
        Self { decisions }
    }

    /// Persist the append-only decision row and emit a structured log
    /// line carrying the job's correlation id. Any persistence failure is
    /// logged but never propagated: a decision-logging failure must not
    /// retroactively fail a job that otherwise completed.
    #[allow(clippy::too_many_arguments)]
    pub async fn log_triage_decision(
        &self,
        issue_id: &str,
        correlation_id: &str,
        stack_trace: Option<&str>,
        affected_files: &[String],
        root_cause: Option<&str>,
        confidence: f64,
        draft_pr_url: Option<&str>,
        processing_time_ms: i64,
    ) -> Option<TriageDecisionRow> {
        match self
            .decisions
            .insert(issue_id, stack_trace, affected_files, root_cause, confidence, draft_pr_url, processing_time_ms)
            .await
        {
            Ok(row) => {
                info!(
                    correlation_id,
                    issue_id,
                    confidence,
                    processing_time_ms,
                    affected_file_count = affected_files.len(),
                    draft_pr_url,
                    "triage decision recorded"
                );
                Some(row)
            }
            Err(e) => {
                error!(correlation_id, issue_id, error = %e, "failed to persist triage decision");
                None
            }
        }
    }

    /// Log a non-decision system event (breaker state transition, config
    /// change, admin alert) at the given severity. `data` is logged as a
    /// serialized JSON string field, matching the original's
    /// `json.dumps(event_data)` shape.
    pub fn log_system_event(&self, event_type: &str, data: &Value, level: EventLevel) {
        let data = data.to_string();
        match level {
            EventLevel::Info => info!(event_type, data, "system event"),
            EventLevel::Warning => warn!(event_type, data, "system event"),
            EventLevel::Error => error!(event_type, data, "system event"),
            EventLevel::Critical => error!(event_type, data, critical = true, "system event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlation_id_follows_expected_shape() {
        let id = correlation_id("42");
        assert!(id.starts_with("triage_42_"));
        let suffix = id.strip_prefix("triage_42_").unwrap();
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
