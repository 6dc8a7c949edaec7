//! Invocation hook domain.
//!
//! - [`traits::ToolHook`] — PRE/POST observer of tool invocations
//! - [`traits::SessionHook`] — listener for session lifecycle events
//! - [`entities::HookRegistration`] — a hook plus phase, priority, pattern and scope
//! - [`entities::TrustScope`] — dotted scope gating who may register
//!
//! Hooks are synchronous and ordered by descending priority within a phase;
//! registrations with equal priority keep their registration order.

pub mod entities;
pub mod traits;

pub use entities::{
    FailurePolicy, HookPhase, HookRegistration, SessionRegistration, ToolPattern, TrustScope,
};
pub use traits::{HookDecision, HookError, SessionHook, ToolHook};
