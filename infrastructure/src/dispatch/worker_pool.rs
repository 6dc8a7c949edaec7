//! Bounded worker pool for blocking handlers.
//!
//! Blocking handler bodies run on tokio's blocking thread pool, but a
//! semaphore caps how many run at once so a burst of slow tools cannot
//! exhaust it. Waiters queue on the semaphore in arrival order.

use std::any::Any;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool is shut down")]
    Closed,
    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// Semaphore-bounded wrapper around `spawn_blocking`.
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    /// Create a pool running at most `capacity` tasks at once.
    ///
    /// A capacity of zero would deadlock every caller, so it is raised
    /// to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Create a pool sized to twice the machine's parallelism.
    pub fn with_default_capacity() -> Self {
        let capacity = std::thread::available_parallelism()
            .map(|n| n.get() * 2)
            .unwrap_or(4);
        Self::new(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits not currently held by running tasks.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run a blocking task on the pool, waiting for a permit first.
    ///
    /// A panic inside the task is caught by the join handle and reported
    /// as [`PoolError::Panicked`]; it never unwinds into the caller.
    pub async fn run<T, F>(&self, task: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        let handle = tokio::task::spawn_blocking(move || {
            // Hold the permit for the task's whole run.
            let _permit = permit;
            task()
        });

        match handle.await {
            Ok(value) => Ok(value),
            Err(join_error) => {
                if join_error.is_panic() {
                    Err(PoolError::Panicked(panic_message(join_error.into_panic())))
                } else {
                    Err(PoolError::Closed)
                }
            }
        }
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
