//! Hook infrastructure.
//!
//! - [`chain`]: priority-ordered hook chain behind the dispatch port
//! - [`audit`]: ready-made JSONL audit hook

pub mod audit;
pub mod chain;

pub use audit::JsonlAuditHook;
pub use chain::HookChain;
