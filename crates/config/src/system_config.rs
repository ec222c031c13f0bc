//! In-memory representation of a `system_config` row.
//!
//! `db` owns the persisted table; this type is the shared shape other
//! crates (`resilience`, `notify`, `assignment`) read and write through the
//! narrow repository trait each of them is handed, so none of them need to
//! depend on `db` (and, transitively, on `sqlx`) directly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemConfigEntry {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

impl SystemConfigEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A minimal key/value store contract `SystemConfig` readers depend on.
///
/// Kept as a trait (rather than a concrete `sqlx` pool) so that
/// `resilience`, `notify`, and `assignment` can be unit-tested against an
/// in-memory fake instead of a real database.
#[async_trait::async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str, description: Option<&str>);
}
