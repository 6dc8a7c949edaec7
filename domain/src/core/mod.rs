//! Core domain concepts shared across all subdomains.
//!
//! - [`error::BindError`] — argument binding failures
//! - [`error::PipelineError`] — everything that can abort an invocation
//! - [`error::RegistrationError`] — startup-time registration failures

pub mod error;
