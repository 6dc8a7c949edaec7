//! Per-call ambient context.
//!
//! The context is passed explicitly through every dispatch-path function and
//! into handler bodies; there is no thread-local "current context" because
//! handlers may run on a worker pool where the current thread is not stable
//! per logical call.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Identity of the inbound request as supplied by the transport.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    request_id: String,
    client_id: Option<String>,
    session_id: Option<String>,
    transport: Option<String>,
    server_name: Option<String>,
}

impl RequestInfo {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn transport(&self) -> Option<&str> {
        self.transport.as_deref()
    }

    pub fn server_name(&self) -> Option<&str> {
        self.server_name.as_deref()
    }
}

/// Shared, session-scoped key-value state.
///
/// Clones share the underlying map, so every context built for the same
/// session observes the same entries.
#[derive(Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Remove a key, returning the previous value if any.
    pub fn delete(&self, key: &str) -> Option<Value> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("entries", &self.len())
            .finish()
    }
}

/// Severity of a client-directed log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Channel for client-directed messages emitted by a running handler.
///
/// Implementations must be cheap and non-blocking; they are called from
/// handler bodies on either execution path.
pub trait ContextSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn progress(&self, progress: f64, total: Option<f64>, message: Option<&str>);
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ContextSink for NoopSink {
    fn log(&self, _level: LogLevel, _message: &str) {}

    fn progress(&self, _progress: f64, _total: Option<f64>, _message: Option<&str>) {}
}

/// Ambient per-call context.
///
/// Cheap to clone; handlers receive it by value alongside their bound
/// arguments.
#[derive(Clone)]
pub struct ToolContext {
    request: RequestInfo,
    state: SessionState,
    sink: Arc<dyn ContextSink>,
}

impl ToolContext {
    pub fn new(request: RequestInfo) -> Self {
        Self {
            request,
            state: SessionState::new(),
            sink: Arc::new(NoopSink),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ContextSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach session-shared state; contexts built for the same session
    /// should share one [`SessionState`].
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn request_id(&self) -> &str {
        self.request.request_id()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.request.session_id()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn debug(&self, message: &str) {
        self.sink.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.sink.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.sink.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.sink.log(LogLevel::Error, message);
    }

    pub fn report_progress(&self, progress: f64, total: Option<f64>, message: Option<&str>) {
        self.sink.progress(progress, total, message);
    }

    pub fn set_state(&self, key: impl Into<String>, value: Value) {
        self.state.set(key, value);
    }

    pub fn get_state(&self, key: &str) -> Option<Value> {
        self.state.get(key)
    }

    pub fn delete_state(&self, key: &str) -> Option<Value> {
        self.state.delete(key)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::new(RequestInfo::default())
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("request", &self.request)
            .field("state", &self.state)
            .finish()
    }
}
