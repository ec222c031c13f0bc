use std::collections::VecDeque;

use chrono::{DateTime, Utc};

const STATE_CHANGE_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: i64,
    pub success_threshold: u32,
    pub max_requests_half_open: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            timeout_seconds: 60,
            success_threshold: 3,
            max_requests_half_open: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateChange {
    pub from: CircuitState,
    pub to: CircuitState,
    pub at: DateTime<Utc>,
}

/// Monotonically non-decreasing call counters plus a bounded history of
/// state transitions, the way `controller`'s rate limiter keeps per-key
/// counters alongside its entry map.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub state_changes: VecDeque<StateChange>,
}

impl Metrics {
    pub(crate) fn push_state_change(&mut self, from: CircuitState, to: CircuitState, at: DateTime<Utc>) {
        self.state_changes.push_back(StateChange { from, to, at });
        while self.state_changes.len() > STATE_CHANGE_HISTORY {
            self.state_changes.pop_front();
        }
    }
}

/// System-wide degradation level. `Offline` is never derived automatically
/// from breaker state; it is reserved for an operator-declared full outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DegradationLevel {
    Normal,
    Degraded,
    Critical,
    Offline,
}

impl DegradationLevel {
    #[must_use]
    pub fn for_state(state: CircuitState) -> Self {
        match state {
            CircuitState::Closed => Self::Normal,
            CircuitState::HalfOpen => Self::Degraded,
            CircuitState::Open => Self::Critical,
        }
    }
}
