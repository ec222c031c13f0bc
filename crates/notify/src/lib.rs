//! Notification dispatcher: routes a triage decision to the configured
//! on-call chat id or to the resolved assignee, retrying under a circuit
//! breaker and persisting undelivered messages for later replay.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use notify::{Dispatcher, NotifyEvent, SlackDmChannel};
//!
//! # async fn run(users: db::UserRepo, breaker: Arc<resilience::CircuitBreaker>, config_store: Arc<dyn config::ConfigStore>) {
//! let channel = Arc::new(SlackDmChannel::from_env());
//! let dispatcher = Dispatcher::new(channel, users, breaker, config_store);
//!
//! dispatcher.dispatch(NotifyEvent::RouteToHuman {
//!     issue_id: "42".to_string(),
//!     issue_url: "https://github.com/acme/widgets/issues/42".to_string(),
//!     confidence: 45.0,
//!     suggested_assignee: None,
//!     reasoning: "no candidates found".to_string(),
//!     timestamp: chrono::Utc::now(),
//! }).await;
//! # }
//! ```
//!
//! # Configuration
//!
//! - `SLACK_BOT_TOKEN`: Slack bot token (enables the Slack channel)
//! - `SystemConfig.on_call_engineer_chat_id`: recipient for `RouteToHuman` events
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for notification channels
//! - [`SlackDmChannel`] implements Slack DM delivery via `chat.postMessage`
//! - [`Dispatcher`] resolves the recipient, retries under a circuit breaker,
//!   and persists a fallback record when delivery is ultimately unsuccessful

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
mod dispatcher;
pub mod error;
pub mod events;

pub use channels::slack::SlackDmChannel;
pub use channels::NotifyChannel;
pub use dispatcher::Dispatcher;
pub use error::ChannelError;
pub use events::{NotifyEvent, Severity};
