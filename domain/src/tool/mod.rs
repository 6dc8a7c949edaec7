//! Tool domain module
//!
//! This module defines the core abstractions for the **invocation pipeline** —
//! how a registered tool is described, how caller arguments are bound to its
//! declared parameters, and how its outcome is marshalled back to the caller.
//!
//! # Overview
//!
//! Every tool is defined by a [`ToolDescriptor`] (name, parameters, handler).
//! An [`InvocationRequest`] carries the caller's untyped arguments; the
//! [`ArgumentBinder`] turns them into ordered, coerced [`BoundArguments`];
//! the handler's outcome is marshalled into an [`InvocationResult`].
//!
//! ```text
//! ┌────────────────┐    ┌──────────────────┐    ┌──────────────────┐
//! │ ToolDescriptor │───▶│ ArgumentBinder   │───▶│ BoundArguments   │
//! │ (declaration)  │    │ (coercion)       │    │ (handler input)  │
//! └────────────────┘    └──────────────────┘    └────────┬─────────┘
//!                                                        │
//!                       ┌──────────────────┐    ┌────────▼─────────┐
//!                       │ InvocationResult │◀───│ ToolHandler      │
//!                       │ (marshalled)     │    │ (blocking/async) │
//!                       └──────────────────┘    └──────────────────┘
//! ```
//!
//! # Binding Guarantees
//!
//! - Parameters bind in declaration order, first error wins
//! - Context parameters are injected by the dispatcher, never caller-supplied
//! - Absent optionals fall back to a declared default, then to the shape's
//!   zero value, so handlers never see an absent key
//!
//! # Marshalling
//!
//! [`InvocationResult`] is the single terminal type: handler values and every
//! pipeline failure both end up there, so callers never observe a raw error.

pub mod binding;
pub mod entities;
pub mod handler;
pub mod value_objects;

pub use binding::{ArgumentBinder, BindLimits};
pub use entities::{ParameterMetadata, ParameterSpec, ToolDescriptor, ToolRecord};
pub use handler::{HandlerFailure, HandlerFuture, ToolHandler};
pub use value_objects::{
    ArgumentMap, BoundArguments, InvocationOutcome, InvocationRequest, InvocationResult,
};
