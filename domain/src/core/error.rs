//! Pipeline error taxonomy

use thiserror::Error;

/// Errors raised while binding raw arguments against a tool descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("Missing required parameter: {parameter}")]
    Missing { parameter: String },

    #[error("Invalid enum value for parameter '{parameter}': {value}")]
    InvalidEnumValue { parameter: String, value: String },

    #[error("Cannot coerce parameter '{parameter}': {reason}")]
    Coercion { parameter: String, reason: String },

    #[error("Too many arguments: {count} exceeds limit of {limit}")]
    TooManyArguments { count: usize, limit: usize },

    #[error("Argument '{parameter}' exceeds size limit of {limit} bytes")]
    ValueTooLarge { parameter: String, limit: usize },
}

impl BindError {
    /// Parameter name the error refers to, when it refers to one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            BindError::Missing { parameter }
            | BindError::InvalidEnumValue { parameter, .. }
            | BindError::Coercion { parameter, .. }
            | BindError::ValueTooLarge { parameter, .. } => Some(parameter),
            BindError::TooManyArguments { .. } => None,
        }
    }
}

/// Errors that can terminate an invocation before a successful marshal.
///
/// Every member is converted into an error-flagged `InvocationResult` at the
/// pipeline boundary; none of them cross it as a raw `Err`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("Tool '{tool}' denied by hook: {message}")]
    HookDenied { tool: String, message: String },

    #[error("Hook failed for tool '{tool}': {message}")]
    HookFailed { tool: String, message: String },

    #[error("Handler for tool '{tool}' failed: {message}")]
    Handler { tool: String, message: String },

    #[error("Failed to marshal result: {0}")]
    Marshal(String),
}

impl PipelineError {
    /// Check if this error represents an explicit hook denial
    pub fn is_denial(&self) -> bool {
        matches!(self, PipelineError::HookDenied { .. })
    }

    /// Check if this error originated in the handler body
    pub fn is_handler_failure(&self) -> bool {
        matches!(self, PipelineError::Handler { .. })
    }
}

/// Errors returned to the registering caller at startup.
///
/// These never reach the invocation path: a descriptor or hook that fails
/// registration simply does not exist at dispatch time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Invalid descriptor for tool '{tool}': {reason}")]
    InvalidDescriptor { tool: String, reason: String },

    #[error("Hook '{hook}' scope '{scope}' is outside trusted scope '{trusted}'")]
    UntrustedScope {
        hook: String,
        scope: String,
        trusted: String,
    },
}
