//! Pooled handler dispatcher.
//!
//! Routes each invocation by handler variant: blocking bodies go through
//! the bounded [`WorkerPool`], deferred bodies are awaited inline on the
//! caller's task. Either way a panicking handler is contained and comes
//! back as a handler failure for its tool only.

use crate::dispatch::worker_pool::{WorkerPool, panic_message};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use toolgate_application::ports::handler_dispatch::HandlerDispatchPort;
use toolgate_domain::context::ToolContext;
use toolgate_domain::core::error::PipelineError;
use toolgate_domain::tool::entities::ToolRecord;
use toolgate_domain::tool::handler::ToolHandler;
use toolgate_domain::tool::value_objects::BoundArguments;
use tracing::debug;

/// Handler dispatcher backed by a bounded worker pool.
#[derive(Debug)]
pub struct PooledDispatcher {
    pool: WorkerPool,
}

impl PooledDispatcher {
    pub fn new(pool: WorkerPool) -> Self {
        Self { pool }
    }

    pub fn with_default_pool() -> Self {
        Self::new(WorkerPool::with_default_capacity())
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }
}

impl Default for PooledDispatcher {
    fn default() -> Self {
        Self::with_default_pool()
    }
}

#[async_trait]
impl HandlerDispatchPort for PooledDispatcher {
    async fn invoke(
        &self,
        record: &ToolRecord,
        arguments: BoundArguments,
        context: ToolContext,
    ) -> Result<Value, PipelineError> {
        let tool = record.name().to_string();

        match record.descriptor().handler() {
            ToolHandler::Blocking(body) => {
                debug!("Dispatching '{}' to the worker pool", tool);
                let body = Arc::clone(body);
                match self.pool.run(move || body(arguments, context)).await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(failure)) => Err(PipelineError::Handler {
                        tool,
                        message: failure.message().to_string(),
                    }),
                    Err(pool_error) => Err(PipelineError::Handler {
                        tool,
                        message: pool_error.to_string(),
                    }),
                }
            }
            ToolHandler::Deferred(body) => {
                debug!("Awaiting deferred handler for '{}'", tool);
                let future = body(arguments, context);
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(failure)) => Err(PipelineError::Handler {
                        tool,
                        message: failure.message().to_string(),
                    }),
                    Err(payload) => Err(PipelineError::Handler {
                        tool,
                        message: panic_message(payload),
                    }),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Barrier;
    use std::time::Duration;
    use toolgate_domain::schema::Schema;
    use toolgate_domain::tool::entities::ToolDescriptor;
    use toolgate_domain::tool::handler::HandlerFailure;

    fn record(name: &str, handler: ToolHandler) -> ToolRecord {
        ToolRecord::new(
            ToolDescriptor::new(name, "test tool", handler),
            Schema::permissive(),
        )
    }

    fn args(name: &str, value: Value) -> BoundArguments {
        let mut bound = BoundArguments::new();
        bound.push(name, value);
        bound
    }

    #[tokio::test]
    async fn test_blocking_handler_result_comes_back() {
        let dispatcher = PooledDispatcher::new(WorkerPool::new(2));
        let record = record(
            "double",
            ToolHandler::blocking(|args, _ctx| Ok(json!(args.get_i64("n").unwrap_or(0) * 2))),
        );

        let value = dispatcher
            .invoke(&record, args("n", json!(21)), ToolContext::default())
            .await
            .unwrap();
        assert_eq!(value, json!(42));
    }

    #[tokio::test]
    async fn test_deferred_handler_is_awaited_inline() {
        let dispatcher = PooledDispatcher::new(WorkerPool::new(1));
        let record = record(
            "echo",
            ToolHandler::deferred(|args, _ctx| async move {
                Ok(args.get("text").cloned().unwrap_or(Value::Null))
            }),
        );

        let value = dispatcher
            .invoke(&record, args("text", json!("hi")), ToolContext::default())
            .await
            .unwrap();
        assert_eq!(value, json!("hi"));
        // The pool is not involved for deferred handlers.
        assert_eq!(dispatcher.pool().available(), 1);
    }

    #[tokio::test]
    async fn test_handler_failure_is_attributed_to_the_tool() {
        let dispatcher = PooledDispatcher::with_default_pool();
        let record = record(
            "fragile",
            ToolHandler::blocking(|_args, _ctx| Err(HandlerFailure::new("disk full"))),
        );

        let error = dispatcher
            .invoke(&record, BoundArguments::new(), ToolContext::default())
            .await
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "Handler for tool 'fragile' failed: disk full"
        );
    }

    #[tokio::test]
    async fn test_blocking_panic_is_contained() {
        let dispatcher = PooledDispatcher::new(WorkerPool::new(1));
        let record = record(
            "crashy",
            ToolHandler::blocking(|_args, _ctx| panic!("boom")),
        );

        let error = dispatcher
            .invoke(&record, BoundArguments::new(), ToolContext::default())
            .await
            .unwrap_err();
        assert!(error.is_handler_failure());
        assert!(error.to_string().contains("boom"));
        assert_eq!(dispatcher.pool().available(), 1);
    }

    #[tokio::test]
    async fn test_deferred_panic_is_contained() {
        let dispatcher = PooledDispatcher::new(WorkerPool::new(1));
        let record = record(
            "crashy_async",
            ToolHandler::deferred(|_args, _ctx| async { panic!("late boom") }),
        );

        let error = dispatcher
            .invoke(&record, BoundArguments::new(), ToolContext::default())
            .await
            .unwrap_err();
        assert!(error.is_handler_failure());
        assert!(error.to_string().contains("late boom"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_blocking_handlers_run_side_by_side() {
        let dispatcher = Arc::new(PooledDispatcher::new(WorkerPool::new(2)));
        let barrier = Arc::new(Barrier::new(2));

        // Each handler waits for the other at the barrier, so the test can
        // only finish if both run at the same time.
        let meet = {
            let barrier = Arc::clone(&barrier);
            ToolHandler::blocking(move |_args, _ctx| {
                barrier.wait();
                Ok(json!("met"))
            })
        };
        let record = Arc::new(record("meet", meet));

        let first = {
            let dispatcher = Arc::clone(&dispatcher);
            let record = Arc::clone(&record);
            tokio::spawn(async move {
                dispatcher
                    .invoke(&record, BoundArguments::new(), ToolContext::default())
                    .await
            })
        };
        let second = {
            let dispatcher = Arc::clone(&dispatcher);
            let record = Arc::clone(&record);
            tokio::spawn(async move {
                dispatcher
                    .invoke(&record, BoundArguments::new(), ToolContext::default())
                    .await
            })
        };

        let (first, second) = tokio::time::timeout(Duration::from_secs(5), async {
            (first.await.unwrap(), second.await.unwrap())
        })
        .await
        .expect("handlers should meet at the barrier");
        assert_eq!(first.unwrap(), json!("met"));
        assert_eq!(second.unwrap(), json!("met"));
    }
}
