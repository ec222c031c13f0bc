use std::sync::Arc;

use chrono::Utc;
use config::{keys, ConfigStore};
use tracing::error;

/// Emits at most one administrator alert per hour for a given
/// `(service, error-signature)` pair, persisting the last-emitted timestamp
/// into `SystemConfig` so a dashboard can list recent degradations.
pub struct AlertThrottle {
    config_store: Arc<dyn ConfigStore>,
}

impl AlertThrottle {
    #[must_use]
    pub fn new(config_store: Arc<dyn ConfigStore>) -> Self {
        Self { config_store }
    }

    /// Raise an alert if the throttle window for this signature has elapsed.
    pub async fn maybe_raise(&self, service: &str, error_signature: &str, detail: &str) {
        let key = format!("{}{service}_{}", keys::ADMIN_ALERT_PREFIX, signature_hash(error_signature));

        let now = Utc::now();
        if let Some(last) = self.config_store.get(&key).await {
            if let Ok(last_at) = chrono::DateTime::parse_from_rfc3339(&last) {
                if now - last_at.with_timezone(&Utc) < chrono::Duration::hours(1) {
                    return;
                }
            }
        }

        error!(
            service,
            error_signature, detail, "circuit breaker degraded service alert"
        );
        self.config_store.set(&key, &now.to_rfc3339(), Some("last admin alert emission")).await;
    }
}

fn signature_hash(signature: &str) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    signature.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct FakeStore(Mutex<HashMap<String, String>>);

    #[async_trait::async_trait]
    impl ConfigStore for FakeStore {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().await.get(key).cloned()
        }
        async fn set(&self, key: &str, value: &str, _description: Option<&str>) {
            self.0.lock().await.insert(key.to_string(), value.to_string());
        }
    }

    #[tokio::test]
    async fn second_alert_within_hour_is_suppressed() {
        let store = Arc::new(FakeStore(Mutex::new(HashMap::new())));
        let throttle = AlertThrottle::new(store.clone());

        throttle.maybe_raise("llm", "timeout", "first").await;
        let key_count_after_first = store.0.lock().await.len();
        throttle.maybe_raise("llm", "timeout", "second").await;
        let key_count_after_second = store.0.lock().await.len();

        assert_eq!(key_count_after_first, key_count_after_second);
    }
}
