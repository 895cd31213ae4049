//! Deferred one-shot callbacks.
//!
//! Timers are fire-and-forget: nothing waits on them and a task that finds
//! its target gone simply does nothing.
use std::time::Duration;

use tokio::runtime::Handle;

use crate::api::{Result, RuntimeError};

/// A callback run once after a delay.
pub type DeferredTask = Box<dyn FnOnce() + Send + 'static>;

/// Schedules [`DeferredTask`]s.
pub trait Scheduler: Send + Sync {
    fn run_later(&self, delay: Duration, task: DeferredTask);
}

/// Schedules tasks on a tokio runtime with `tokio::time::sleep`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Binds to the tokio runtime the caller is running in.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(RuntimeError::MissingAsyncRuntime)
    }
}

impl Scheduler for TokioScheduler {
    fn run_later(&self, delay: Duration, task: DeferredTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
