//! The normalized record the ingress route hands to the job queue, and
//! the GitHub `issues`/`pull_request` event parsers that produce it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Issue,
    PullRequest,
}

/// `{type, issue_id|pr_id, number, title, body, url, repository, created_at, user, [draft]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRecord {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub issue_id: String,
    pub number: Option<i64>,
    pub title: String,
    pub body: String,
    pub url: String,
    pub repository: String,
    pub created_at: Option<DateTime<Utc>>,
    pub user: String,
    pub draft: Option<bool>,
}

/// Parse an `issues` webhook payload. Returns `None` for any action other
/// than `opened`.
#[must_use]
pub fn parse_issue_event(payload: &Value) -> Option<NormalizedRecord> {
    if payload.get("action").and_then(Value::as_str) != Some("opened") {
        return None;
    }

    let issue = payload.get("issue")?;
    Some(NormalizedRecord {
        record_type: RecordType::Issue,
        issue_id: issue.get("id").map(value_to_id_string).unwrap_or_default(),
        number: issue.get("number").and_then(Value::as_i64),
        title: string_field(issue, "title"),
        body: string_field(issue, "body"),
        url: string_field(issue, "html_url"),
        repository: payload.get("repository").map(|r| string_field(r, "full_name")).unwrap_or_default(),
        created_at: issue.get("created_at").and_then(Value::as_str).and_then(parse_timestamp),
        user: issue.get("user").map(|u| string_field(u, "login")).unwrap_or_default(),
        draft: None,
    })
}

/// Parse a `pull_request` webhook payload. Returns `None` for any action
/// other than `opened`.
#[must_use]
pub fn parse_pull_request_event(payload: &Value) -> Option<NormalizedRecord> {
    if payload.get("action").and_then(Value::as_str) != Some("opened") {
        return None;
    }

    let pr = payload.get("pull_request")?;
    Some(NormalizedRecord {
        record_type: RecordType::PullRequest,
        issue_id: pr.get("id").map(value_to_id_string).unwrap_or_default(),
        number: pr.get("number").and_then(Value::as_i64),
        title: string_field(pr, "title"),
        body: string_field(pr, "body"),
        url: string_field(pr, "html_url"),
        repository: payload.get("repository").map(|r| string_field(r, "full_name")).unwrap_or_default(),
        created_at: pr.get("created_at").and_then(Value::as_str).and_then(parse_timestamp),
        user: pr.get("user").map(|u| string_field(u, "login")).unwrap_or_default(),
        draft: pr.get("draft").and_then(Value::as_bool),
    })
}

fn value_to_id_string(value: &Value) -> String {
    value.as_i64().map_or_else(|| value.as_str().unwrap_or_default().to_string(), |id| id.to_string())
}

fn string_field(object: &Value, field: &str) -> String {
    object.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_issue_event_ignores_non_opened_actions() {
        let payload = serde_json::json!({"action": "closed", "issue": {"id": 1}});
        assert!(parse_issue_event(&payload).is_none());
    }

    #[test]
    fn parse_issue_event_extracts_fields() {
        let payload = serde_json::json!({
            "action": "opened",
            "issue": {
                "id": 42,
                "number": 7,
                "title": "Crash on startup",
                "body": "Traceback...",
                "html_url": "https://github.com/acme/widgets/issues/7",
                "created_at": "2024-03-05T12:30:45Z",
                "user": {"login": "alice"},
            },
            "repository": {"full_name": "acme/widgets"},
        });

        let record = parse_issue_event(&payload).unwrap();
        assert_eq!(record.record_type, RecordType::Issue);
        assert_eq!(record.issue_id, "42");
        assert_eq!(record.number, Some(7));
        assert_eq!(record.repository, "acme/widgets");
        assert_eq!(record.user, "alice");
        assert!(record.draft.is_none());
    }

    #[test]
    fn parse_pull_request_event_extracts_draft_flag() {
        let payload = serde_json::json!({
            "action": "opened",
            "pull_request": {
                "id": 9,
                "number": 3,
                "title": "Fix flaky test",
                "body": "",
                "html_url": "https://github.com/acme/widgets/pull/3",
                "created_at": "2024-03-05T12:30:45Z",
                "user": {"login": "bob"},
                "draft": true,
            },
            "repository": {"full_name": "acme/widgets"},
        });

        let record = parse_pull_request_event(&payload).unwrap();
        assert_eq!(record.record_type, RecordType::PullRequest);
        assert_eq!(record.draft, Some(true));
    }
}
