//! Handler Dispatch port
//!
//! Defines the interface for executing a tool's handler. Implementations
//! decide where the body runs: the pooled dispatcher isolates blocking
//! handlers on worker threads and awaits deferred handlers inline.

use async_trait::async_trait;
use serde_json::Value;
use toolgate_domain::context::ToolContext;
use toolgate_domain::core::error::PipelineError;
use toolgate_domain::tool::entities::ToolRecord;
use toolgate_domain::tool::value_objects::BoundArguments;

/// Port for handler execution
///
/// Implementations must contain handler panics and report them as
/// [`PipelineError::Handler`]; a misbehaving tool never takes the pipeline
/// down with it.
#[async_trait]
pub trait HandlerDispatchPort: Send + Sync {
    /// Execute the record's handler with bound arguments and context.
    async fn invoke(
        &self,
        record: &ToolRecord,
        arguments: BoundArguments,
        context: ToolContext,
    ) -> Result<Value, PipelineError>;
}
