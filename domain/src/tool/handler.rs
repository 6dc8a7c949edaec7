//! Handler capabilities.
//!
//! A handler is resolved once, at registration time, into a callable value;
//! dispatch never performs runtime type lookup. The two variants encode the
//! two execution disciplines: a blocking body that must be isolated on the
//! worker pool, and a deferred body whose future is awaited on the shared
//! dispatch context.

use crate::context::ToolContext;
use crate::tool::value_objects::BoundArguments;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Failure signalled by a handler body.
///
/// Carries only a message: by the time a failure crosses the dispatch
/// boundary it is presentation, not control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFailure {
    message: String,
}

impl HandlerFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Wrap any displayable error.
    pub fn from_error(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HandlerFailure {}

impl From<String> for HandlerFailure {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerFailure {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Boxed future returned by deferred handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, HandlerFailure>> + Send>>;

type BlockingFn =
    dyn Fn(BoundArguments, ToolContext) -> Result<Value, HandlerFailure> + Send + Sync;
type DeferredFn = dyn Fn(BoundArguments, ToolContext) -> HandlerFuture + Send + Sync;

/// The callable behind a tool.
#[derive(Clone)]
pub enum ToolHandler {
    /// Runs on the worker pool; may block.
    Blocking(Arc<BlockingFn>),
    /// Returns a future awaited on the dispatch context; must not block.
    Deferred(Arc<DeferredFn>),
}

impl ToolHandler {
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn(BoundArguments, ToolContext) -> Result<Value, HandlerFailure>
            + Send
            + Sync
            + 'static,
    {
        ToolHandler::Blocking(Arc::new(f))
    }

    pub fn deferred<F, Fut>(f: F) -> Self
    where
        F: Fn(BoundArguments, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, HandlerFailure>> + Send + 'static,
    {
        ToolHandler::Deferred(Arc::new(move |arguments, context| {
            Box::pin(f(arguments, context))
        }))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ToolHandler::Deferred(_))
    }
}

impl fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolHandler::Blocking(_) => f.write_str("ToolHandler::Blocking"),
            ToolHandler::Deferred(_) => f.write_str("ToolHandler::Deferred"),
        }
    }
}
