//! Domain layer for toolgate
//!
//! This crate contains the core entities and value objects of the tool
//! invocation pipeline. It has no dependencies on infrastructure or
//! transport concerns.
//!
//! # Core Concepts
//!
//! ## Shapes and Schemas
//!
//! A [`shape::TypeShape`] is the language-neutral description of a parameter
//! type; [`schema::Schema`] is the JSON-Schema-like document generated from
//! it and published to callers. Shapes may be recursive through
//! [`shape::CompositeShape`], schemas never are.
//!
//! ## Binding
//!
//! The [`tool::ArgumentBinder`] turns a caller's untyped argument map into
//! the ordered [`tool::BoundArguments`] a handler receives, coercing values
//! to their declared shapes and rejecting what cannot be coerced.
//!
//! ## Hooks
//!
//! [`hook::ToolHook`] implementations observe invocations in a PRE and a
//! POST phase and may allow, deny, or modify them. [`hook::SessionHook`]
//! implementations listen to the session lifecycle instead.
//!
//! ## Context
//!
//! [`context::ToolContext`] carries request identity, shared session state,
//! and a logging sink into handlers as an explicit argument.

pub mod context;
pub mod core;
pub mod hook;
pub mod schema;
pub mod session;
pub mod shape;
pub mod tool;

// Re-export commonly used types
pub use context::{ContextSink, LogLevel, NoopSink, RequestInfo, SessionState, ToolContext};
pub use core::error::{BindError, PipelineError, RegistrationError};
pub use hook::{
    entities::{
        FailurePolicy, HookPhase, HookRegistration, SessionRegistration, ToolPattern, TrustScope,
    },
    traits::{HookDecision, HookError, SessionHook, ToolHook},
};
pub use schema::{Schema, SchemaProperties, SchemaType};
pub use session::events::{BootstrapConfig, EndReason, ExpiryReason, SessionEvent};
pub use shape::{CompositeShape, FieldShape, PrimitiveKind, TypeShape};
pub use tool::{
    binding::{ArgumentBinder, BindLimits},
    entities::{ParameterMetadata, ParameterSpec, ToolDescriptor, ToolRecord},
    handler::{HandlerFailure, HandlerFuture, ToolHandler},
    value_objects::{
        ArgumentMap, BoundArguments, InvocationOutcome, InvocationRequest, InvocationResult,
    },
};
