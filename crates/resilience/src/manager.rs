use std::collections::HashMap;
use std::sync::Arc;

use config::ConfigStore;

use crate::breaker::CircuitBreaker;
use crate::types::{BreakerConfig, DegradationLevel};

/// Owns one [`CircuitBreaker`] per external service and reports the
/// system-wide degradation level as the worst among them.
pub struct DegradationManager {
    breakers: HashMap<String, Arc<CircuitBreaker>>,
    config_store: Arc<dyn ConfigStore>,
}

impl DegradationManager {
    #[must_use]
    pub fn new(config_store: Arc<dyn ConfigStore>) -> Self {
        Self { breakers: HashMap::new(), config_store }
    }

    /// Register a breaker for `service` with the given config, returning a
    /// cheap-to-clone handle callers pass to [`CircuitBreaker::call`].
    pub fn register(&mut self, service: impl Into<String>, config: BreakerConfig) -> Arc<CircuitBreaker> {
        let service = service.into();
        let breaker = Arc::new(CircuitBreaker::new(service.clone(), config, self.config_store.clone()));
        self.breakers.insert(service, breaker.clone());
        breaker
    }

    #[must_use]
    pub fn get(&self, service: &str) -> Option<Arc<CircuitBreaker>> {
        self.breakers.get(service).cloned()
    }

    /// The worst degradation level across all registered services.
    pub async fn system_status(&self) -> DegradationLevel {
        let mut worst = DegradationLevel::Normal;
        for breaker in self.breakers.values() {
            let level = DegradationLevel::for_state(breaker.state().await);
            if level > worst {
                worst = level;
            }
        }
        worst
    }

    /// Per-service status snapshot, for the detailed health endpoint.
    pub async fn service_statuses(&self) -> HashMap<String, DegradationLevel> {
        let mut statuses = HashMap::new();
        for (service, breaker) in &self.breakers {
            statuses.insert(service.clone(), DegradationLevel::for_state(breaker.state().await));
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;
    use tokio::sync::Mutex;

    struct FakeStore(Mutex<StdHashMap<String, String>>);

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
    async fn system_status_is_normal_with_no_registered_services() {
        let manager = DegradationManager::new(Arc::new(FakeStore(Mutex::new(StdHashMap::new()))));
        assert_eq!(manager.system_status().await, DegradationLevel::Normal);
    }

    #[tokio::test]
    async fn system_status_reflects_worst_breaker() {
        let mut manager = DegradationManager::new(Arc::new(FakeStore(Mutex::new(StdHashMap::new()))));
        let llm = manager.register("llm", BreakerConfig { failure_threshold: 1, ..Default::default() });
        manager.register("chat", BreakerConfig::default());

        let no_fallback: Option<fn() -> std::future::Ready<Result<(), String>>> = None;
        let _ = llm.call(|| async { Err::<(), _>("down".to_string()) }, no_fallback).await;

        assert_eq!(manager.system_status().await, DegradationLevel::Critical);
    }
}
