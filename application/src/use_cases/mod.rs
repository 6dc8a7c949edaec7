//! Use cases (application flows)
//!
//! Each use case wires domain logic to ports and exposes one `execute`-style
//! entry point for the layer above.

pub mod invoke_tool;

pub use invoke_tool::InvokeToolUseCase;
