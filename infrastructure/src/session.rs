//! Session lifecycle tracking.
//!
//! Tracks one shared [`SessionState`] per session id with an idle deadline,
//! and announces every transition on the hook chain's session stream:
//! `Bootstrap` then `Start` on creation, `Expiring` then `End` on timeout,
//! `End` on explicit termination. Events fire outside the tracker's lock so
//! listeners may call back into it.

use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use toolgate_application::ports::hook_dispatch::HookDispatchPort;
use toolgate_domain::context::{RequestInfo, SessionState, ToolContext};
use toolgate_domain::session::events::{BootstrapConfig, EndReason, ExpiryReason, SessionEvent};
use tracing::debug;

/// Snapshot of a freshly bootstrapped session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: String,
    state: SessionState,
    created_at: Instant,
    expires_at: Instant,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

struct TrackedSession {
    state: SessionState,
    timeout: Duration,
    created_at: Instant,
    expires_at: Instant,
}

/// Lifecycle manager for tracked sessions.
pub struct SessionTracker {
    sessions: RwLock<HashMap<String, TrackedSession>>,
    hooks: Arc<dyn HookDispatchPort>,
    default_timeout: Duration,
}

impl SessionTracker {
    pub fn new(hooks: Arc<dyn HookDispatchPort>, default_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            hooks,
            default_timeout,
        }
    }

    /// Create a tracked session and announce `Bootstrap` then `Start`.
    ///
    /// Bootstrapping an id that is already tracked replaces it with a fresh
    /// state; the old state stays alive only through contexts that already
    /// hold it.
    pub fn bootstrap(
        &self,
        session_id: impl Into<String>,
        config: BootstrapConfig,
    ) -> SessionHandle {
        let session_id = session_id.into();
        let now = Instant::now();

        let state = SessionState::new();
        state.set("tenant_id", json!(config.tenant_id()));
        state.set("persona", json!(config.persona()));
        if let Some(user_id) = config.user_id() {
            state.set("user_id", json!(user_id));
        }

        let tracked = TrackedSession {
            state: state.clone(),
            timeout: config.timeout(),
            created_at: now,
            expires_at: now + config.timeout(),
        };
        let handle = SessionHandle {
            session_id: session_id.clone(),
            state,
            created_at: tracked.created_at,
            expires_at: tracked.expires_at,
        };

        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session_id.clone(), tracked);
        debug!("Bootstrapped session '{}'", session_id);

        self.hooks.notify_session(&SessionEvent::Bootstrap {
            session_id: session_id.clone(),
            config,
        });
        self.hooks
            .notify_session(&SessionEvent::Start { session_id });

        handle
    }

    /// Bootstrap with default settings and the tracker's default timeout.
    pub fn bootstrap_default(&self, session_id: impl Into<String>) -> SessionHandle {
        self.bootstrap(
            session_id,
            BootstrapConfig::new().with_timeout(self.default_timeout),
        )
    }

    /// The shared state of a tracked session.
    pub fn state_for(&self, session_id: &str) -> Option<SessionState> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session_id)
            .map(|tracked| tracked.state.clone())
    }

    /// Re-arm a session's idle deadline.
    pub fn touch(&self, session_id: &str) -> bool {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match sessions.get_mut(session_id) {
            Some(tracked) => {
                tracked.expires_at = Instant::now() + tracked.timeout;
                true
            }
            None => false,
        }
    }

    /// Build a per-call context for an inbound request.
    ///
    /// When the request names a tracked session its shared state is
    /// attached and the idle deadline re-armed; otherwise the context gets
    /// a fresh private state.
    pub fn context_for(&self, request: RequestInfo) -> ToolContext {
        let state = request.session_id().and_then(|id| {
            let mut sessions = self
                .sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            sessions.get_mut(id).map(|tracked| {
                tracked.expires_at = Instant::now() + tracked.timeout;
                tracked.state.clone()
            })
        });

        let context = ToolContext::new(request);
        match state {
            Some(state) => context.with_state(state),
            None => context,
        }
    }

    /// Remove sessions whose deadline has passed, firing `Expiring` then
    /// `End{Expired}` for each. Returns the removed ids.
    pub fn check_expiry(&self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        {
            let mut sessions = self
                .sessions
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            sessions.retain(|session_id, tracked| {
                if tracked.expires_at <= now {
                    expired.push(session_id.clone());
                    false
                } else {
                    true
                }
            });
        }

        for session_id in &expired {
            debug!("Session '{}' expired", session_id);
            self.hooks.notify_session(&SessionEvent::Expiring {
                session_id: session_id.clone(),
                reason: ExpiryReason::Timeout,
            });
            self.hooks.notify_session(&SessionEvent::End {
                session_id: session_id.clone(),
                reason: EndReason::Expired,
            });
        }
        expired
    }

    /// Remove one session, firing `End` with the given reason.
    pub fn terminate(&self, session_id: &str, reason: EndReason) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(session_id)
            .is_some();

        if removed {
            debug!("Session '{}' terminated ({})", session_id, reason.code());
            self.hooks.notify_session(&SessionEvent::End {
                session_id: session_id.to_string(),
                reason,
            });
        }
        removed
    }

    /// Tear down every session, announcing the shutdown to listeners.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<String> = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(session_id, _)| session_id)
            .collect();

        for session_id in &drained {
            self.hooks.notify_session(&SessionEvent::Expiring {
                session_id: session_id.clone(),
                reason: ExpiryReason::ServerShutdown,
            });
            self.hooks.notify_session(&SessionEvent::End {
                session_id: session_id.clone(),
                reason: EndReason::Manual,
            });
        }
        drained.len()
    }

    pub fn active_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

impl fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTracker")
            .field("active", &self.active_count())
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}
