use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use config::ConfigStore;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::alerts::AlertThrottle;
use crate::types::{BreakerConfig, CircuitState, Metrics};

#[derive(Debug, Error)]
pub enum BreakerError<E> {
    #[error("primary call failed: {0}")]
    Primary(E),
    #[error("degraded: primary and fallback both failed (primary: {primary}, fallback: {fallback})")]
    Degraded { primary: String, fallback: String },
    #[error("degraded: service {0} is open and no fallback is registered")]
    OpenNoFallback(String),
}

struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    half_open_successes: u32,
    half_open_requests: u32,
    last_failure_time: Option<DateTime<Utc>>,
    metrics: Metrics,
}

/// One breaker instance guards one external service (`llm`, `chat`,
/// `source-hosting`, ...). A single mutex serializes admission and
/// bookkeeping for that service, mirroring `controller`'s per-key rate
/// limiter map but scoped to one entry since each service gets its own
/// breaker instance.
pub struct CircuitBreaker {
    service: String,
    config: BreakerConfig,
    inner: Mutex<Inner>,
    alerts: AlertThrottle,
}

impl CircuitBreaker {
    #[must_use]
    pub fn new(service: impl Into<String>, config: BreakerConfig, config_store: Arc<dyn ConfigStore>) -> Self {
        Self {
            service: service.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                half_open_successes: 0,
                half_open_requests: 0,
                last_failure_time: None,
                metrics: Metrics::default(),
            }),
            alerts: AlertThrottle::new(config_store),
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    pub async fn metrics(&self) -> Metrics {
        self.inner.lock().await.metrics.clone()
    }

    /// Run `primary`. If admission is refused (breaker open) or `primary`
    /// fails, fall through to `fallback` when one is supplied. If both the
    /// primary and the fallback fail, the call returns
    /// [`BreakerError::Degraded`] and an administrator alert is raised
    /// (throttled to one per hour per `(service, error)` pair).
    pub async fn call<T, E, Fut, FFut>(
        &self,
        primary: impl FnOnce() -> Fut,
        fallback: Option<impl FnOnce() -> FFut>,
    ) -> Result<T, BreakerError<E>>
    where
        Fut: Future<Output = Result<T, E>>,
        FFut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        if !self.admit().await {
            return self.run_fallback(fallback, "breaker open".to_string()).await;
        }

        match primary().await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(err) => {
                self.record_failure().await;
                match fallback {
                    None => Err(BreakerError::Primary(err)),
                    Some(_) => self.run_fallback(fallback, err.to_string()).await,
                }
            }
        }
    }

    async fn run_fallback<T, E, FFut>(
        &self,
        fallback: Option<impl FnOnce() -> FFut>,
        primary_failure: String,
    ) -> Result<T, BreakerError<E>>
    where
        FFut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let Some(fallback) = fallback else {
            return Err(BreakerError::OpenNoFallback(self.service.clone()));
        };

        match fallback().await {
            Ok(value) => {
                debug!(service = %self.service, "fallback served the call");
                Ok(value)
            }
            Err(fallback_err) => {
                let fallback_msg = fallback_err.to_string();
                self.alerts
                    .maybe_raise(&self.service, &primary_failure, &fallback_msg)
                    .await;
                Err(BreakerError::Degraded { primary: primary_failure, fallback: fallback_msg })
            }
        }
    }

    /// Returns whether a call should be admitted, transitioning
    /// `open` → `half_open` once the timeout has elapsed.
    async fn admit(&self) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner
                    .last_failure_time
                    .map(|t| (Utc::now() - t).num_seconds())
                    .unwrap_or(i64::MAX);
                if elapsed >= self.config.timeout_seconds {
                    let now = Utc::now();
                    inner.metrics.push_state_change(CircuitState::Open, CircuitState::HalfOpen, now);
                    inner.state = CircuitState::HalfOpen;
                    inner.half_open_requests = 0;
                    inner.half_open_successes = 0;
                    info!(service = %self.service, "circuit half-open, probing");
                    inner.half_open_requests += 1;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.half_open_requests < self.config.max_requests_half_open {
                    inner.half_open_requests += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        inner.metrics.total += 1;
        inner.metrics.successful += 1;

        match inner.state {
            CircuitState::Closed => inner.consecutive_failures = 0,
            CircuitState::HalfOpen => {
                inner.half_open_successes += 1;
                if inner.half_open_successes >= self.config.success_threshold {
                    let now = Utc::now();
                    inner.metrics.push_state_change(CircuitState::HalfOpen, CircuitState::Closed, now);
                    inner.state = CircuitState::Closed;
                    inner.consecutive_failures = 0;
                    info!(service = %self.service, "circuit closed after successful probes");
                }
            }
            CircuitState::Open => {}
        }
    }

    async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.metrics.total += 1;
        inner.metrics.failed += 1;
        let now = Utc::now();
        inner.last_failure_time = Some(now);

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    inner.metrics.push_state_change(CircuitState::Closed, CircuitState::Open, now);
                    inner.state = CircuitState::Open;
                    warn!(service = %self.service, "circuit opened after {} consecutive failures", inner.consecutive_failures);
                }
            }
            CircuitState::HalfOpen => {
                inner.metrics.push_state_change(CircuitState::HalfOpen, CircuitState::Open, now);
                inner.state = CircuitState::Open;
                warn!(service = %self.service, "circuit reopened on probe failure");
            }
            CircuitState::Open => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex as TokioMutex;

    struct FakeStore(TokioMutex<HashMap<String, String>>);

    #[async_trait::async_trait]
    impl ConfigStore for FakeStore {
        async fn get(&self, key: &str) -> Option<String> {
            self.0.lock().await.get(key).cloned()
        }
        async fn set(&self, key: &str, value: &str, _description: Option<&str>) {
            self.0.lock().await.insert(key.to_string(), value.to_string());
        }
    }

    fn store() -> Arc<dyn ConfigStore> {
        Arc::new(FakeStore(TokioMutex::new(HashMap::new())))
    }

    fn fast_config() -> BreakerConfig {
        BreakerConfig { failure_threshold: 2, timeout_seconds: 0, success_threshold: 1, max_requests_half_open: 5 }
    }

    #[tokio::test]
    async fn opens_after_consecutive_failures() {
        let breaker = CircuitBreaker::new("llm", fast_config(), store());

        for _ in 0..2 {
            let no_fallback: Option<fn() -> std::future::Ready<Result<(), String>>> = None;
            let result = breaker.call(|| async { Err::<(), _>("boom".to_string()) }, no_fallback).await;
            assert!(result.is_err());
        }

        assert_eq!(breaker.state().await, CircuitState::Open);
    }

    #[tokio::test]
    async fn half_open_probe_success_closes_circuit() {
        let breaker = CircuitBreaker::new("llm", fast_config(), store());

        let no_unit_fallback: Option<fn() -> std::future::Ready<Result<(), String>>> = None;
        for _ in 0..2 {
            let _ = breaker.call(|| async { Err::<(), _>("boom".to_string()) }, no_unit_fallback).await;
        }
        assert_eq!(breaker.state().await, CircuitState::Open);

        let no_str_fallback: Option<fn() -> std::future::Ready<Result<&'static str, String>>> = None;
        let result = breaker.call(|| async { Ok("recovered") }, no_str_fallback).await;

        assert!(result.is_ok());
        assert_eq!(breaker.state().await, CircuitState::Closed);
    }

    #[tokio::test]
    async fn fallback_serves_call_when_primary_fails() {
        let breaker = CircuitBreaker::new("chat", fast_config(), store());

        let result = breaker
            .call(
                || async { Err::<&str, _>("unreachable".to_string()) },
                Some(|| async { Ok::<&str, String>("fallback-value") }),
            )
            .await;

        assert_eq!(result.unwrap(), "fallback-value");
    }

    #[tokio::test]
    async fn degraded_when_primary_and_fallback_both_fail() {
        let breaker = CircuitBreaker::new("chat", fast_config(), store());

        let result = breaker
            .call(
                || async { Err::<&str, _>("primary down".to_string()) },
                Some(|| async { Err::<&str, _>("fallback down".to_string()) }),
            )
            .await;

        assert!(matches!(result, Err(BreakerError::Degraded { .. })));
    }
}
