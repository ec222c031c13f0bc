use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use config::{keys, ConfigStore};
use db::UserRepo;
use resilience::{BreakerConfig, CircuitBreaker};
use tracing::{error, warn};

use crate::channels::NotifyChannel;
use crate::error::ChannelError;
use crate::events::NotifyEvent;

const MAX_ATTEMPTS: u32 = 5;

/// `original_source/backend/slack_notification_service.py`'s delivery loop,
/// rebuilt against [`NotifyChannel`] and wrapped by `resilience::CircuitBreaker`
/// under service id `chat`.
pub struct Dispatcher {
    channel: Arc<dyn NotifyChannel>,
    users: UserRepo,
    breaker: Arc<CircuitBreaker>,
    config_store: Arc<dyn ConfigStore>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(channel: Arc<dyn NotifyChannel>, users: UserRepo, breaker: Arc<CircuitBreaker>, config_store: Arc<dyn ConfigStore>) -> Self {
        Self { channel, users, breaker, config_store }
    }

    #[must_use]
    pub fn breaker_config() -> BreakerConfig {
        BreakerConfig::default()
    }

    /// Resolve the recipient for `event` and attempt delivery. Always
    /// returns successfully to the caller: an unreachable chat service or
    /// an unresolved recipient is persisted for later replay rather than
    /// surfaced as a pipeline failure.
    pub async fn dispatch(&self, event: NotifyEvent) {
        let recipient = match &event {
            NotifyEvent::RouteToHuman { .. } => self.config_store.get(keys::ON_CALL_ENGINEER_CHAT_ID).await,
            NotifyEvent::Assignment { assignee_email, .. } => self.resolve_active_chat_id(assignee_email).await,
        };

        let Some(recipient) = recipient else {
            error!(event = %event.title(), "no recipient chat id available, persisting for replay");
            self.persist_fallback("unresolved", &event).await;
            return;
        };

        self.send_with_retry(&recipient, event).await;
    }

    async fn resolve_active_chat_id(&self, git_email: &str) -> Option<String> {
        match self.users.find_by_git_email(git_email).await {
            Ok(Some(mapping)) if mapping.is_active => Some(mapping.chat_id),
            Ok(Some(_)) => {
                warn!(email = %git_email, "assignee mapping is inactive, cannot notify");
                None
            }
            Ok(None) => {
                warn!(email = %git_email, "no chat id mapping for assignee");
                None
            }
            Err(e) => {
                warn!(email = %git_email, error = %e, "user lookup failed while resolving chat id");
                None
            }
        }
    }

    async fn send_with_retry(&self, recipient: &str, event: NotifyEvent) {
        let channel = Arc::clone(&self.channel);
        let recipient_owned = recipient.to_string();
        let event_for_attempts = event.clone();

        let primary = || async move {
            let mut last_err = ChannelError::Other("no delivery attempts made".to_string());

            for attempt in 0..MAX_ATTEMPTS {
                match channel.send(&recipient_owned, &event_for_attempts).await {
                    Ok(()) => return Ok(()),
                    Err(e) if !e.is_retryable() => return Err(e),
                    Err(e) => {
                        warn!(attempt = attempt + 1, error = %e, "notification send failed, retrying");
                        last_err = e;
                    }
                }

                if attempt + 1 < MAX_ATTEMPTS {
                    let backoff_secs = 2_u64.saturating_pow(attempt).min(60);
                    tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                }
            }

            Err(last_err)
        };

        let no_fallback: Option<fn() -> std::future::Ready<Result<(), ChannelError>>> = None;

        if let Err(e) = self.breaker.call(primary, no_fallback).await {
            error!(recipient, error = %e, "chat delivery exhausted, persisting for replay");
            self.persist_fallback(recipient, &event).await;
        }
    }

    async fn persist_fallback(&self, recipient: &str, event: &NotifyEvent) {
        let key = format!("{}{recipient}_{}", keys::FAILED_NOTIFICATION_PREFIX, Utc::now().timestamp());
        match serde_json::to_string(event) {
            Ok(payload) => {
                self.config_store.set(&key, &payload, Some("undelivered notification, queued for replay")).await;
            }
            Err(e) => error!(error = %e, "failed to serialize notification for fallback persistence"),
        }
    }
}
