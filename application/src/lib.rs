//! Application layer for toolgate
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::PipelineSettings;
pub use ports::{
    handler_dispatch::HandlerDispatchPort,
    hook_dispatch::{HookDispatchPort, PreHookOutcome},
    observer::{InvocationObserverPort, NoInvocationObserver},
    tool_registry::ToolRegistryPort,
};
pub use use_cases::invoke_tool::InvokeToolUseCase;
