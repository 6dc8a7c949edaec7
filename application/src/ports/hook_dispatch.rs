//! Hook Dispatch port
//!
//! Defines the interface for running the registered hook chain around a
//! tool invocation. Ordering, trust enforcement, and the failure policy all
//! live behind this port.

use toolgate_domain::core::error::PipelineError;
use toolgate_domain::session::events::SessionEvent;
use toolgate_domain::tool::value_objects::{ArgumentMap, InvocationOutcome};

/// What the PRE phase decided about an invocation that may proceed.
///
/// `arguments` is the map as the last hook saw it; `modified` records
/// whether any hook replaced it, in which case the caller must re-bind
/// before dispatching the handler.
#[derive(Debug, Clone)]
pub struct PreHookOutcome {
    pub arguments: ArgumentMap,
    pub modified: bool,
}

impl PreHookOutcome {
    pub fn unchanged(arguments: ArgumentMap) -> Self {
        Self {
            arguments,
            modified: false,
        }
    }

    pub fn modified(arguments: ArgumentMap) -> Self {
        Self {
            arguments,
            modified: true,
        }
    }
}

/// Port for hook chain execution
///
/// Hooks are synchronous; the chain runs them in priority order on the
/// caller's task.
pub trait HookDispatchPort: Send + Sync {
    /// Run the PRE phase over the canonical argument map.
    ///
    /// A denial or a strict-policy hook failure returns `Err`, which stops
    /// the invocation before the handler is dispatched.
    fn run_pre(&self, tool: &str, arguments: ArgumentMap)
    -> Result<PreHookOutcome, PipelineError>;

    /// Run the POST phase over the handler's outcome.
    ///
    /// Always called once a handler was dispatched, whether it succeeded
    /// or failed. Hooks may replace a successful value but can never turn
    /// a failure into a success.
    fn run_post(
        &self,
        tool: &str,
        arguments: &ArgumentMap,
        outcome: InvocationOutcome,
    ) -> InvocationOutcome;

    /// Deliver a session lifecycle event to every session listener.
    fn notify_session(&self, event: &SessionEvent);
}
