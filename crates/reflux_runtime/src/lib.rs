//! Reflux runtime: runs feedback side effects on tokio's current-thread executor.
//!
//! Everything here must be used from inside a [`tokio::task::LocalSet`]:
//! view models are single-threaded, so deferred work is spawned with
//! `spawn_local` and re-enters the event loop on the same thread.
mod effect;
mod scheduler;

pub use effect::spawn_effect;
pub use scheduler::LocalScheduler;

use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to build tokio runtime: {0}")]
    Build(#[from] std::io::Error),
}

/// Current-thread runtime with timers enabled, suitable for driving a `LocalSet`.
pub fn build_runtime() -> Result<Runtime, RuntimeError> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}
