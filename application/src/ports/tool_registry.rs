//! Tool Registry port
//!
//! Defines the interface for looking up registered tools.

use std::sync::Arc;
use toolgate_domain::tool::entities::ToolRecord;

/// Port for tool lookup
///
/// This port defines how the application layer resolves a tool name to its
/// registered record. Registration itself is an infrastructure concern; by
/// the time a record is visible here its handler is already resolved and
/// its input schema already generated.
pub trait ToolRegistryPort: Send + Sync {
    /// Get the record for a tool, if registered
    fn lookup(&self, name: &str) -> Option<Arc<ToolRecord>>;

    /// Names of all registered tools
    fn names(&self) -> Vec<String>;

    /// Check if a tool is registered
    fn has_tool(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}
