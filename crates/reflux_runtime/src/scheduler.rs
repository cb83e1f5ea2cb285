use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use reflux_core::{Scheduler, Task};
use reflux_logging::reflux_trace;

/// [`Scheduler`] backed by `tokio::task::spawn_local`.
///
/// Panics on `schedule` when called outside a `LocalSet`. A task dropped
/// before it runs (aborted, or its `LocalSet` dropped) no longer counts as
/// in flight.
#[derive(Debug, Clone, Default)]
pub struct LocalScheduler {
    in_flight: Rc<Cell<usize>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks scheduled but not yet run.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }
}

impl Scheduler for LocalScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.in_flight.set(self.in_flight.get() + 1);
        let pending = scopeguard::guard(Rc::clone(&self.in_flight), |in_flight| {
            in_flight.set(in_flight.get() - 1);
        });
        tokio::task::spawn_local(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            drop(pending);
            let turn = reflux_logging::next_turn();
            reflux_trace!("Local scheduler turn {} after {:?}", turn, delay);
            task();
        });
    }
}
