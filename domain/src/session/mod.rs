//! Session lifecycle events.
//!
//! Sessions move through bootstrap → active → expiring → ended; each
//! transition emits a [`events::SessionEvent`] on the hook chain's session
//! stream, outside the per-call PRE/POST path.

pub mod events;
