//! Hook behavior traits.

use crate::session::events::SessionEvent;
use crate::tool::value_objects::{ArgumentMap, InvocationOutcome};
use serde_json::Value;
use std::fmt;

/// An internal failure raised by a hook, distinct from a deliberate denial.
///
/// How a failure affects the invocation is decided by the chain's failure
/// policy, not by the hook itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HookError {}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Verdict returned by a hook observation.
///
/// `ModifyArguments` is only honored in the PRE phase and `ModifyResult`
/// only in the POST phase (and only for successful outcomes); anything else
/// is logged and ignored by the chain.
#[derive(Debug, Clone, PartialEq)]
pub enum HookDecision {
    /// Let the invocation proceed unchanged.
    Allow,
    /// Stop the invocation before the handler runs.
    Deny { message: String },
    /// Replace the argument map seen by later hooks and the handler.
    ModifyArguments(ArgumentMap),
    /// Replace a successful handler value before marshalling.
    ModifyResult(Value),
}

impl HookDecision {
    pub fn deny(message: impl Into<String>) -> Self {
        HookDecision::Deny {
            message: message.into(),
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, HookDecision::Allow)
    }
}

/// Observer of tool invocations.
///
/// Both phases default to [`HookDecision::Allow`] so an implementation only
/// overrides the phase it participates in.
pub trait ToolHook: Send + Sync {
    /// Called after binding succeeds, before the handler runs.
    fn before_invoke(
        &self,
        _tool: &str,
        _arguments: &ArgumentMap,
    ) -> Result<HookDecision, HookError> {
        Ok(HookDecision::Allow)
    }

    /// Called after the handler completes, whether it succeeded or failed.
    fn after_invoke(
        &self,
        _tool: &str,
        _arguments: &ArgumentMap,
        _outcome: &InvocationOutcome,
    ) -> Result<HookDecision, HookError> {
        Ok(HookDecision::Allow)
    }
}

/// Observer of session lifecycle events.
pub trait SessionHook: Send + Sync {
    fn on_session_event(&self, event: &SessionEvent) -> Result<(), HookError>;
}
