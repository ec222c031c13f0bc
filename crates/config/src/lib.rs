//! Environment-driven configuration for the triage engine.
//!
//! The core treats `GITHUB_TOKEN`, `GITHUB_WEBHOOK_SECRET`, `SLACK_BOT_TOKEN`,
//! and `GEMINI_API_KEY` as opaque credentials for the `source-hosting`,
//! `chat`, and `llm` external services respectively; this crate only knows
//! their env var names, not their shape.
//!
//! # Usage
//!
//! ```no_run
//! use config::Settings;
//!
//! let settings = Settings::from_env();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod system_config;

pub use system_config::{ConfigStore, SystemConfigEntry};

use std::time::Duration;
use tracing::{info, warn};

/// Well-known `SystemConfig` keys read/written by the pipeline.
pub mod keys {
    pub const CONFIDENCE_THRESHOLD: &str = "confidence_threshold";
    pub const ON_CALL_ENGINEER_CHAT_ID: &str = "on_call_engineer_chat_id";
    pub const DRAFT_PR_BRANCH_PREFIX: &str = "draft_pr_branch_prefix";
    pub const FAILED_NOTIFICATION_PREFIX: &str = "failed_notification_";
    pub const ADMIN_ALERT_PREFIX: &str = "admin_alert_";
}

/// Default value for `confidence_threshold`, mirrored in `keys::CONFIDENCE_THRESHOLD`.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 60.0;

/// Application settings loaded from environment variables.
///
/// Mirrors `original_source/backend/config.py`'s `Settings`, rebuilt as a
/// plain struct with an explicit `from_env()` constructor in the same style
/// as `notify::SlackDmChannel::from_env()`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub github_token: Option<String>,
    pub github_webhook_secret: Option<String>,
    pub slack_bot_token: Option<String>,
    pub gemini_api_key: Option<String>,

    pub confidence_threshold: f64,
    pub draft_pr_enabled: bool,
    pub duplicate_detection_window: Duration,

    pub webhook_timeout: Duration,
    pub git_blame_timeout: Duration,
    pub ai_analysis_timeout: Duration,

    pub bind_addr: String,
    pub repo_dir: std::path::PathBuf,
}

impl Settings {
    /// Load settings from environment variables, falling back to a local
    /// `.env` file if present, then to the defaults from
    /// `original_source/backend/config.py`.
    #[must_use]
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            info!("no .env file found, reading configuration from the environment only");
        }

        let database_url = env_or("DATABASE_URL", "postgres://localhost/triage");
        let github_token = std::env::var("GITHUB_TOKEN").ok();
        let github_webhook_secret = std::env::var("GITHUB_WEBHOOK_SECRET").ok();
        let slack_bot_token = std::env::var("SLACK_BOT_TOKEN").ok();
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();

        if github_webhook_secret.is_none() {
            warn!("GITHUB_WEBHOOK_SECRET not set; webhook signature verification is disabled");
        }

        let confidence_threshold =
            env_parsed("CONFIDENCE_THRESHOLD", DEFAULT_CONFIDENCE_THRESHOLD);
        let draft_pr_enabled = env_parsed("DRAFT_PR_ENABLED", true);
        let duplicate_detection_window =
            Duration::from_secs(60 * env_parsed::<u64>("DUPLICATE_DETECTION_WINDOW_MINUTES", 10));

        let webhook_timeout = Duration::from_secs(env_parsed("WEBHOOK_TIMEOUT_SECONDS", 30));
        let git_blame_timeout = Duration::from_secs(env_parsed("GIT_BLAME_TIMEOUT_SECONDS", 5));
        let ai_analysis_timeout = Duration::from_secs(env_parsed("AI_ANALYSIS_TIMEOUT_SECONDS", 30));

        let bind_addr = env_or("BIND_ADDR", "0.0.0.0:8080");
        let repo_dir = std::path::PathBuf::from(env_or("REPO_DIR", "."));

        Self {
            database_url,
            github_token,
            github_webhook_secret,
            slack_bot_token,
            gemini_api_key,
            confidence_threshold,
            draft_pr_enabled,
            duplicate_detection_window,
            webhook_timeout,
            git_blame_timeout,
            ai_analysis_timeout,
            bind_addr,
            repo_dir,
        }
    }

    /// Whether all credentials required for full (non-degraded) operation are present.
    #[must_use]
    pub fn is_fully_configured(&self) -> bool {
        self.github_token.is_some()
            && self.github_webhook_secret.is_some()
            && self.slack_bot_token.is_some()
            && self.gemini_api_key.is_some()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        for key in [
            "CONFIDENCE_THRESHOLD",
            "DRAFT_PR_ENABLED",
            "DUPLICATE_DETECTION_WINDOW_MINUTES",
            "GITHUB_WEBHOOK_SECRET",
        ] {
            std::env::remove_var(key);
        }
        let settings = Settings::from_env();
        assert!((settings.confidence_threshold - DEFAULT_CONFIDENCE_THRESHOLD).abs() < f64::EPSILON);
        assert!(settings.draft_pr_enabled);
        assert_eq!(settings.duplicate_detection_window, Duration::from_secs(600));
        assert!(settings.github_webhook_secret.is_none());
    }

    #[test]
    #[serial]
    fn test_override_from_env() {
        std::env::set_var("CONFIDENCE_THRESHOLD", "75");
        let settings = Settings::from_env();
        assert!((settings.confidence_threshold - 75.0).abs() < f64::EPSILON);
        std::env::remove_var("CONFIDENCE_THRESHOLD");
    }
}
