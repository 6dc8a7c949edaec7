//! Invocation Observer port
//!
//! Defines the interface for recording per-invocation telemetry.

use std::time::Duration;

/// Port for invocation telemetry
///
/// Called exactly once per invocation, after the result is final. `success`
/// reflects the marshalled result, so a denial or binding failure counts as
/// a failed invocation even though no handler ran.
pub trait InvocationObserverPort: Send + Sync {
    fn on_invocation(&self, tool: &str, duration: Duration, success: bool);
}

/// No-op observer for callers that do not collect telemetry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInvocationObserver;

impl InvocationObserverPort for NoInvocationObserver {
    fn on_invocation(&self, _tool: &str, _duration: Duration, _success: bool) {}
}
