//! Pipeline settings — invocation behavior control.
//!
//! [`PipelineSettings`] groups the static parameters that control the
//! invocation pipeline: worker pool sizing, hook failure policy, trust
//! root, binding limits, and session expiry. These are application-layer
//! concerns; how they are loaded from files is an infrastructure concern.

use std::time::Duration;
use toolgate_domain::hook::entities::{FailurePolicy, TrustScope};
use toolgate_domain::tool::binding::BindLimits;

/// Invocation pipeline control parameters.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Worker pool capacity for blocking handlers.
    /// `None` sizes the pool from available parallelism.
    pub workers: Option<usize>,
    /// How the hook chain reacts to a hook's internal error.
    pub failure_policy: FailurePolicy,
    /// Trust root that hook registrations must fall under.
    pub trust_scope: TrustScope,
    /// Caps on caller-supplied arguments.
    pub bind_limits: BindLimits,
    /// Idle lifetime of a session before it expires.
    pub session_timeout: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            workers: None,
            failure_policy: FailurePolicy::default(),
            trust_scope: TrustScope::default(),
            bind_limits: BindLimits::default(),
            session_timeout: Duration::from_secs(3600),
        }
    }
}

impl PipelineSettings {
    // ==================== Builder Methods ====================

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_trust_scope(mut self, scope: impl Into<TrustScope>) -> Self {
        self.trust_scope = scope.into();
        self
    }

    pub fn with_bind_limits(mut self, limits: BindLimits) -> Self {
        self.bind_limits = limits;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }
}
