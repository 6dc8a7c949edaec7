//! Invocation value objects.
//!
//! Everything here is created per call and discarded after: the raw request,
//! the bound argument vector handed to the handler, the outcome POST hooks
//! observe, and the marshalled result returned upstream.

use crate::context::ToolContext;
use crate::core::error::PipelineError;
use crate::tool::handler::HandlerFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Untyped argument map as supplied by the transport and seen by hooks.
pub type ArgumentMap = HashMap<String, Value>;

/// A single inbound call.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    pub tool_name: String,
    pub arguments: ArgumentMap,
    pub context: ToolContext,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, context: ToolContext) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: ArgumentMap::new(),
            context,
        }
    }

    /// Builder method to add an argument
    pub fn with_arg(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}

/// Ordered, coerced arguments produced by the binder.
///
/// Entries follow the descriptor's declared parameter order with context
/// parameters excluded; handlers read them through the typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    entries: Vec<(String, Value)>,
}

impl BoundArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Values in declared order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Get a required string argument, or a handler failure naming it.
    pub fn require_str(&self, name: &str) -> Result<&str, HandlerFailure> {
        self.get_str(name)
            .ok_or_else(|| HandlerFailure::new(format!("Missing or invalid argument: {name}")))
    }

    pub fn require_i64(&self, name: &str) -> Result<i64, HandlerFailure> {
        self.get_i64(name)
            .ok_or_else(|| HandlerFailure::new(format!("Missing or invalid argument: {name}")))
    }

    /// Re-expressed as the untyped map hooks operate on.
    pub fn to_map(&self) -> ArgumentMap {
        self.entries.iter().cloned().collect()
    }
}

/// What a completed handler produced, as observed by POST hooks.
#[derive(Debug)]
pub enum InvocationOutcome {
    Success(Value),
    Failure(PipelineError),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            InvocationOutcome::Success(value) => Some(value),
            InvocationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            InvocationOutcome::Success(_) => None,
            InvocationOutcome::Failure(error) => Some(error),
        }
    }
}

impl From<Result<Value, PipelineError>> for InvocationOutcome {
    fn from(result: Result<Value, PipelineError>) -> Self {
        match result {
            Ok(value) => InvocationOutcome::Success(value),
            Err(error) => InvocationOutcome::Failure(error),
        }
    }
}

/// Terminal value handed back to the transport collaborator.
///
/// Marshalling rules:
///
/// | Handler value | Content |
/// |---------------|---------|
/// | null / absent | empty string |
/// | string | passed through unquoted |
/// | number / boolean | stringified |
/// | array / object | canonical JSON text |
/// | any pipeline error | the error message, `is_error` set |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub content: String,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl InvocationResult {
    /// Successful result with no content.
    pub fn empty() -> Self {
        Self {
            content: String::new(),
            is_error: false,
            error_message: None,
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            error_message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            content: message.clone(),
            is_error: true,
            error_message: Some(message),
        }
    }

    /// Marshal a handler's return value.
    ///
    /// A serialization failure of a structured value becomes an error
    /// result; nothing propagates past this boundary.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::empty(),
            Value::String(text) => Self::success(text.clone()),
            Value::Number(number) => Self::success(number.to_string()),
            Value::Bool(flag) => Self::success(flag.to_string()),
            structured => match serde_json::to_string(structured) {
                Ok(json) => Self::success(json),
                Err(error) => Self::from_error(&PipelineError::Marshal(error.to_string())),
            },
        }
    }

    /// Marshal a pipeline error.
    pub fn from_error(error: &PipelineError) -> Self {
        Self::error(error.to_string())
    }

    /// Marshal an outcome after the POST phase.
    pub fn from_outcome(outcome: &InvocationOutcome) -> Self {
        match outcome {
            InvocationOutcome::Success(value) => Self::from_value(value),
            InvocationOutcome::Failure(error) => Self::from_error(error),
        }
    }
}
