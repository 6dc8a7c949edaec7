//! Handler dispatch.
//!
//! - [`worker_pool`]: semaphore-bounded `spawn_blocking` wrapper
//! - [`dispatcher`]: routes handlers to the pool or an inline await

pub mod dispatcher;
pub mod worker_pool;

pub use dispatcher::PooledDispatcher;
pub use worker_pool::{PoolError, WorkerPool};
