//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod handler_dispatch;
pub mod hook_dispatch;
pub mod observer;
pub mod tool_registry;
