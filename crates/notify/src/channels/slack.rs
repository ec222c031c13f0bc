//! Slack DM notification channel, using a bot token against
//! `chat.postMessage` rather than an incoming webhook, per
//! `original_source/backend/slack_notification_service.py`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::events::{NotifyEvent, Severity};
use crate::NotifyChannel;

const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Slack error codes for which retrying is pointless: the bot's
/// credentials are bad, the account is deactivated, or the recipient
/// doesn't exist. Matched case-insensitively against `error` in the
/// response body.
const NON_RETRYABLE_CODES: [&str; 4] = ["invalid_auth", "account_inactive", "user_not_found", "channel_not_found"];

/// Sends triage notifications as Slack DMs via a bot token.
pub struct SlackDmChannel {
    bot_token: Option<String>,
    client: reqwest::Client,
    post_message_url: String,
}

impl SlackDmChannel {
    /// Create a channel from `SLACK_BOT_TOKEN`.
    #[must_use]
    pub fn from_env() -> Self {
        let bot_token = std::env::var("SLACK_BOT_TOKEN").ok();

        if bot_token.is_some() {
            debug!("Slack notifications enabled");
        } else {
            debug!("Slack notifications disabled (SLACK_BOT_TOKEN not set)");
        }

        Self { bot_token, client: reqwest::Client::new(), post_message_url: SLACK_POST_MESSAGE_URL.to_string() }
    }

    #[must_use]
    pub fn new(bot_token: String) -> Self {
        Self { bot_token: Some(bot_token), client: reqwest::Client::new(), post_message_url: SLACK_POST_MESSAGE_URL.to_string() }
    }

    /// Create a channel that posts against `base_url` instead of Slack's
    /// real API, for tests.
    #[must_use]
    pub fn with_base_url(bot_token: String, base_url: &str) -> Self {
        Self {
            bot_token: Some(bot_token),
            client: reqwest::Client::new(),
            post_message_url: format!("{base_url}/api/chat.postMessage"),
        }
    }

    fn format_payload(recipient: &str, event: &NotifyEvent) -> SlackMessage {
        let color = event.severity().color().to_string();

        let attachment = SlackAttachment {
            fallback: event.title(),
            color,
            title: event.title(),
            text: format_body(event),
            footer: Some(format!(
                "{} | {}",
                event.severity().as_str(),
                event.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
            )),
        };

        SlackMessage { channel: recipient.to_string(), attachments: vec![attachment] }
    }
}

fn format_body(event: &NotifyEvent) -> String {
    match event {
        NotifyEvent::RouteToHuman { issue_id, issue_url, confidence, suggested_assignee, reasoning, .. } => {
            let suggestion = suggested_assignee
                .as_deref()
                .map_or_else(|| "no candidate found".to_string(), |email| format!("suggested assignee: {email}"));
            format!(
                "Issue <{issue_url}|#{issue_id}> needs human triage (confidence {confidence:.1}%). {suggestion}. {reasoning}"
            )
        }
        NotifyEvent::Assignment {
            issue_id,
            issue_url,
            file_path,
            line_number,
            confidence,
            priority,
            estimated_effort,
            reasoning,
            draft_review_url,
            ..
        } => {
            let mut parts = vec![format!("You've been assigned <{issue_url}|issue #{issue_id}>.")];
            if let Some(file) = file_path {
                match line_number {
                    Some(line) => parts.push(format!("File: `{file}:{line}`.")),
                    None => parts.push(format!("File: `{file}`.")),
                }
            }
            parts.push(format!("Confidence: {confidence:.1}%, priority: {priority}, estimated effort: {estimated_effort}."));
            parts.push(reasoning.clone());
            if let Some(url) = draft_review_url {
                parts.push(format!("Draft fix: {url}"));
            }
            parts.join(" ")
        }
    }
}

#[async_trait]
impl NotifyChannel for SlackDmChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn enabled(&self) -> bool {
        self.bot_token.is_some()
    }

    async fn send(&self, recipient: &str, event: &NotifyEvent) -> Result<(), ChannelError> {
        let bot_token = self.bot_token.as_ref().ok_or_else(|| ChannelError::NotConfigured("SLACK_BOT_TOKEN".to_string()))?;

        let payload = Self::format_payload(recipient, event);

        debug!(channel = "slack", recipient, event = %event.title(), "sending notification");

        let response = self
            .client
            .post(&self.post_message_url)
            .bearer_auth(bot_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body: SlackResponse = response.json().await?;

        if body.ok {
            debug!(channel = "slack", "notification sent");
            return Ok(());
        }

        let error = body.error.unwrap_or_else(|| "unknown_error".to_string());
        let lowered = error.to_ascii_lowercase();

        if NON_RETRYABLE_CODES.iter().any(|code| lowered == *code) {
            warn!(channel = "slack", %status, error = %error, "slack rejected the message, not retrying");
            return Err(ChannelError::NonRetryable(error));
        }

        warn!(channel = "slack", %status, error = %error, "slack chat.postMessage failed");
        Err(ChannelError::Other(error))
    }
}

#[derive(Debug, Serialize)]
struct SlackMessage {
    channel: String,
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    fallback: String,
    color: String,
    title: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn assignment_event() -> NotifyEvent {
        NotifyEvent::Assignment {
            issue_id: "9".to_string(),
            issue_url: "https://github.com/acme/widgets/issues/9".to_string(),
            assignee_email: "dev@example.com".to_string(),
            file_path: Some("src/lib.rs".to_string()),
            line_number: Some(10),
            confidence: 91.0,
            priority: "high".to_string(),
            estimated_effort: "1-2 hours".to_string(),
            reasoning: "strong expertise match".to_string(),
            draft_review_url: None,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn send_succeeds_on_ok_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let channel = SlackDmChannel::with_base_url("xoxb-test".to_string(), &server.uri());
        let result = channel.send("U123", &assignment_event()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn send_classifies_invalid_auth_as_non_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": false, "error": "invalid_auth"})))
            .mount(&server)
            .await;

        let channel = SlackDmChannel::with_base_url("xoxb-test".to_string(), &server.uri());
        let result = channel.send("U123", &assignment_event()).await;
        assert!(matches!(result, Err(ChannelError::NonRetryable(_))));
        assert!(!result.unwrap_err().is_retryable());
    }

    #[tokio::test]
    async fn send_classifies_unknown_error_as_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat.postMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": false, "error": "rate_limited"})))
            .mount(&server)
            .await;

        let channel = SlackDmChannel::with_base_url("xoxb-test".to_string(), &server.uri());
        let result = channel.send("U123", &assignment_event()).await;
        assert!(matches!(result, Err(ChannelError::Other(_))));
        assert!(result.unwrap_err().is_retryable());
    }
}
