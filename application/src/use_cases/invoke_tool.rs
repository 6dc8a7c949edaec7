//! Invoke Tool use case.
//!
//! Executes one tool invocation end to end:
//!
//! 1. Resolve the tool name against the registry
//! 2. Bind caller arguments to the declared parameters
//! 3. Run PRE hooks over the canonical map (re-bind if one modified it)
//! 4. Dispatch the handler through the dispatch port
//! 5. Run POST hooks over the outcome
//! 6. Marshal into an [`InvocationResult`]
//!
//! Every failure along the way is marshalled too: [`invoke()`] never
//! returns an error, so transport code has exactly one shape to forward.
//!
//! [`invoke()`]: InvokeToolUseCase::invoke

use crate::ports::handler_dispatch::HandlerDispatchPort;
use crate::ports::hook_dispatch::HookDispatchPort;
use crate::ports::observer::{InvocationObserverPort, NoInvocationObserver};
use crate::ports::tool_registry::ToolRegistryPort;
use std::sync::Arc;
use std::time::Instant;
use toolgate_domain::core::error::PipelineError;
use toolgate_domain::tool::binding::ArgumentBinder;
use toolgate_domain::tool::value_objects::{
    InvocationOutcome, InvocationRequest, InvocationResult,
};
use tracing::debug;

/// Use case for invoking a registered tool.
///
/// PRE hooks run between binding and dispatch so they observe the
/// canonical, coerced argument map rather than whatever the caller sent.
/// A hook that modifies the map triggers a re-bind, keeping the handler's
/// view typed. POST hooks run only when a handler was actually dispatched;
/// denials and binding failures never reach them.
pub struct InvokeToolUseCase {
    registry: Arc<dyn ToolRegistryPort>,
    hooks: Arc<dyn HookDispatchPort>,
    dispatcher: Arc<dyn HandlerDispatchPort>,
    observer: Arc<dyn InvocationObserverPort>,
    binder: ArgumentBinder,
}

impl Clone for InvokeToolUseCase {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            hooks: self.hooks.clone(),
            dispatcher: self.dispatcher.clone(),
            observer: self.observer.clone(),
            binder: self.binder.clone(),
        }
    }
}

impl InvokeToolUseCase {
    pub fn new(
        registry: Arc<dyn ToolRegistryPort>,
        hooks: Arc<dyn HookDispatchPort>,
        dispatcher: Arc<dyn HandlerDispatchPort>,
    ) -> Self {
        Self {
            registry,
            hooks,
            dispatcher,
            observer: Arc::new(NoInvocationObserver),
            binder: ArgumentBinder::new(),
        }
    }

    /// Create with a telemetry observer.
    pub fn with_observer(mut self, observer: Arc<dyn InvocationObserverPort>) -> Self {
        self.observer = observer;
        self
    }

    /// Create with a binder carrying non-default limits.
    pub fn with_binder(mut self, binder: ArgumentBinder) -> Self {
        self.binder = binder;
        self
    }

    /// Execute one invocation and marshal whatever happened.
    pub async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        let started = Instant::now();
        let tool_name = request.tool_name.clone();

        let result = match self.run(request).await {
            Ok(result) => result,
            Err(error) => {
                debug!("Invocation of '{}' stopped: {}", tool_name, error);
                InvocationResult::from_error(&error)
            }
        };

        self.observer
            .on_invocation(&tool_name, started.elapsed(), !result.is_error);
        result
    }

    async fn run(&self, request: InvocationRequest) -> Result<InvocationResult, PipelineError> {
        let InvocationRequest {
            tool_name,
            arguments,
            context,
        } = request;

        let Some(record) = self.registry.lookup(&tool_name) else {
            return Err(PipelineError::UnknownTool(tool_name));
        };

        // Bind before PRE so hooks observe the canonical map, not the
        // caller's raw one.
        let bound = self.binder.bind(record.descriptor(), &arguments)?;
        let pre = self.hooks.run_pre(&tool_name, bound.to_map())?;
        let bound = if pre.modified {
            self.binder.bind(record.descriptor(), &pre.arguments)?
        } else {
            bound
        };

        debug!(
            "Dispatching '{}' with {} bound arguments",
            tool_name,
            bound.len()
        );
        let dispatched = self.dispatcher.invoke(&record, bound, context).await;
        let outcome = self.hooks.run_post(
            &tool_name,
            &pre.arguments,
            InvocationOutcome::from(dispatched),
        );
        Ok(InvocationResult::from_outcome(&outcome))
    }
}
