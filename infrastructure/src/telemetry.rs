//! Invocation metrics.
//!
//! Per-tool counters behind the observer port. The use case reports every
//! finished invocation; failures include denials, bind rejections, and
//! handler errors alike, since all of them surface as error results.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use toolgate_application::ports::observer::InvocationObserverPort;

/// Accumulated counters for one tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolStats {
    pub invocations: u64,
    pub failures: u64,
    pub total_duration: Duration,
}

impl ToolStats {
    pub fn successes(&self) -> u64 {
        self.invocations - self.failures
    }

    /// Mean wall time per invocation.
    pub fn average_duration(&self) -> Duration {
        if self.invocations == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.invocations as u32
        }
    }
}

/// Observer that accumulates per-tool statistics.
#[derive(Debug, Default)]
pub struct InvocationMetrics {
    stats: RwLock<HashMap<String, ToolStats>>,
}

impl InvocationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats_for(&self, tool: &str) -> Option<ToolStats> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tool)
            .cloned()
    }

    /// Copy of the current counters for reporting.
    pub fn snapshot(&self) -> HashMap<String, ToolStats> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl InvocationObserverPort for InvocationMetrics {
    fn on_invocation(&self, tool: &str, duration: Duration, success: bool) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        let entry = stats.entry(tool.to_string()).or_default();
        entry.invocations += 1;
        if !success {
            entry.failures += 1;
        }
        entry.total_duration += duration;
    }
}
