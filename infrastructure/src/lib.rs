//! Infrastructure layer for toolgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus the [`pipeline::ToolPipeline`] facade
//! that wires them together.

pub mod config;
pub mod dispatch;
pub mod hooks;
pub mod pipeline;
pub mod registry;
pub mod schema;
pub mod session;
pub mod telemetry;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use dispatch::{PooledDispatcher, WorkerPool};
pub use hooks::{HookChain, JsonlAuditHook};
pub use pipeline::ToolPipeline;
pub use registry::ToolRegistry;
pub use schema::SchemaGenerator;
pub use session::{SessionHandle, SessionTracker};
pub use telemetry::{InvocationMetrics, ToolStats};
