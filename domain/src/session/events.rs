//! Lifecycle event types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a session is about to expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryReason {
    Timeout,
    Manual,
    ServerShutdown,
}

impl ExpiryReason {
    /// Stable code used in emitted events and audit records.
    pub fn code(&self) -> &'static str {
        match self {
            ExpiryReason::Timeout => "session_timeout",
            ExpiryReason::Manual => "manual_expiry",
            ExpiryReason::ServerShutdown => "server_shutdown",
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Expired,
    ClientClosed,
    Error,
    Manual,
}

impl EndReason {
    pub fn code(&self) -> &'static str {
        match self {
            EndReason::Expired => "expired",
            EndReason::ClientClosed => "client_closed",
            EndReason::Error => "error",
            EndReason::Manual => "manual",
        }
    }
}

/// Initial settings for a bootstrapped session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    tenant_id: String,
    user_id: Option<String>,
    persona: String,
    timeout: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tenant_id: "default".to_string(),
            user_id: None,
            persona: "default".to_string(),
            timeout: Duration::from_secs(3600),
        }
    }
}

impl BootstrapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = tenant_id.into();
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A session lifecycle notification.
///
/// Dispatched to session hooks as an unordered stream keyed by session id;
/// never part of the PRE/POST invocation path.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Bootstrap {
        session_id: String,
        config: BootstrapConfig,
    },
    Start {
        session_id: String,
    },
    Expiring {
        session_id: String,
        reason: ExpiryReason,
    },
    End {
        session_id: String,
        reason: EndReason,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::Bootstrap { session_id, .. }
            | SessionEvent::Start { session_id }
            | SessionEvent::Expiring { session_id, .. }
            | SessionEvent::End { session_id, .. } => session_id,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::Bootstrap { .. } => "bootstrap",
            SessionEvent::Start { .. } => "start",
            SessionEvent::Expiring { .. } => "expiring",
            SessionEvent::End { .. } => "end",
        }
    }
}
