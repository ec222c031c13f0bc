//! Notification event types for the triage pipeline's dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Slack attachment sidebar color for this severity.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Info => "#3498db",
            Self::Warning => "#f39c12",
            Self::Critical => "#e74c3c",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Events the dispatcher can deliver: escalate to a human, or notify an
/// auto-assigned developer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// Sent to the on-call engineer when `route_to_human` is true.
    RouteToHuman {
        issue_id: String,
        issue_url: String,
        confidence: f64,
        suggested_assignee: Option<String>,
        reasoning: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// Sent to the assignee when the pipeline auto-assigns the issue.
    Assignment {
        issue_id: String,
        issue_url: String,
        assignee_email: String,
        file_path: Option<String>,
        line_number: Option<u32>,
        confidence: f64,
        priority: String,
        estimated_effort: String,
        reasoning: String,
        draft_review_url: Option<String>,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },
}

impl NotifyEvent {
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::RouteToHuman { issue_id, .. } => format!("Routed to human triage: issue #{issue_id}"),
            Self::Assignment { issue_id, assignee_email, .. } => {
                format!("Issue #{issue_id} assigned to {assignee_email}")
            }
        }
    }

    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::RouteToHuman { .. } => Severity::Warning,
            Self::Assignment { .. } => Severity::Info,
        }
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::RouteToHuman { timestamp, .. } | Self::Assignment { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_to_human_titles_and_severity() {
        let event = NotifyEvent::RouteToHuman {
            issue_id: "42".to_string(),
            issue_url: "https://github.com/acme/widgets/issues/42".to_string(),
            confidence: 45.0,
            suggested_assignee: Some("alice@example.com".to_string()),
            reasoning: "low confidence".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.title(), "Routed to human triage: issue #42");
        assert_eq!(event.severity(), Severity::Warning);
    }

    #[test]
    fn assignment_title_names_assignee() {
        let event = NotifyEvent::Assignment {
            issue_id: "7".to_string(),
            issue_url: "https://github.com/acme/widgets/issues/7".to_string(),
            assignee_email: "bob@example.com".to_string(),
            file_path: Some("src/lib.rs".to_string()),
            line_number: Some(42),
            confidence: 91.0,
            priority: "high".to_string(),
            estimated_effort: "1-2 hours".to_string(),
            reasoning: "strong expertise match".to_string(),
            draft_review_url: None,
            timestamp: Utc::now(),
        };
        assert_eq!(event.title(), "Issue #7 assigned to bob@example.com");
        assert_eq!(event.severity(), Severity::Info);
    }
}
