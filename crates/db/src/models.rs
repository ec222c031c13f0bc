//! Row types for the persisted entities: user mappings, assignments,
//! expertise cache, triage decisions, and system config.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserMapping {
    pub id: i64,
    pub git_email: String,
    pub chat_id: String,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Assigned,
    Completed,
    Reassigned,
}

impl AssignmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Completed => "completed",
            Self::Reassigned => "reassigned",
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "completed" => Ok(Self::Completed),
            "reassigned" => Ok(Self::Reassigned),
            other => Err(format!("unknown assignment status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AssignmentRow {
    pub id: i64,
    pub issue_id: String,
    pub issue_url: String,
    pub assignee_email: String,
    pub confidence: f64,
    pub reasoning: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExpertiseCacheRow {
    pub id: i64,
    pub file_path: String,
    pub developer_email: String,
    pub score: f64,
    pub commit_count: i32,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub lines_owned: i32,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TriageDecisionRow {
    pub id: i64,
    pub issue_id: String,
    pub stack_trace: Option<String>,
    pub affected_files: serde_json::Value,
    pub root_cause: Option<String>,
    pub confidence: f64,
    pub draft_pr_url: Option<String>,
    pub processing_time_ms: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemConfigRow {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}
