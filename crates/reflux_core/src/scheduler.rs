use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use reflux_logging::reflux_trace;

/// Deferred unit of work. Runs on the scheduler's thread.
pub type Task = Box<dyn FnOnce()>;

/// Execution context that feedbacks use to continue work on a later turn.
///
/// Implementations run tasks one at a time on a single thread, in due-time
/// order. A task is never run from inside `schedule`.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task);

    /// Runs `task` on the next turn.
    fn defer(&self, task: Task) {
        self.schedule(Duration::ZERO, task);
    }
}

impl<T: Scheduler + ?Sized> Scheduler for Rc<T> {
    fn schedule(&self, delay: Duration, task: Task) {
        (**self).schedule(delay, task);
    }
}

#[derive(Default)]
struct Queue {
    now: Duration,
    seq: u64,
    tasks: BTreeMap<(Duration, u64), Task>,
}

/// Deterministic scheduler with a virtual clock.
///
/// Nothing runs until the owner drives the loop with [`run_ready`],
/// [`advance`] or [`run_until_idle`]. Clones share one queue.
///
/// [`run_ready`]: RunLoop::run_ready
/// [`advance`]: RunLoop::advance
/// [`run_until_idle`]: RunLoop::run_until_idle
#[derive(Clone, Default)]
pub struct RunLoop {
    queue: Rc<RefCell<Queue>>,
}

impl fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.borrow();
        f.debug_struct("RunLoop")
            .field("now", &queue.now)
            .field("pending", &queue.tasks.len())
            .finish()
    }
}

impl RunLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().tasks.len()
    }

    /// Runs every task due at the current time, including tasks those tasks
    /// schedule with zero delay. Returns the number of tasks run.
    pub fn run_ready(&self) -> usize {
        let now = self.now();
        self.run_due(now)
    }

    /// Moves the clock forward by `by`, running tasks as they come due.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let ran = self.run_due(target);
        self.queue.borrow_mut().now = target;
        ran
    }

    /// Runs tasks until the queue is empty, jumping the clock to each due time.
    ///
    /// A task that keeps rescheduling itself makes this loop forever.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_next(None) {
            run_task(task);
            ran += 1;
        }
        ran
    }

    fn run_due(&self, limit: Duration) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_next(Some(limit)) {
            run_task(task);
            ran += 1;
        }
        ran
    }

    /// Removes the earliest task due at or before `limit` and moves the clock to it.
    fn pop_next(&self, limit: Option<Duration>) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let (&(due, _), _) = queue.tasks.first_key_value()?;
        if limit.is_some_and(|limit| due > limit) {
            return None;
        }
        let (_, task) = queue.tasks.pop_first()?;
        queue.now = queue.now.max(due);
        Some(task)
    }
}

fn run_task(task: Task) {
    let turn = reflux_logging::next_turn();
    reflux_trace!("Run loop turn {}", turn);
    task();
}

impl Scheduler for RunLoop {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut queue = self.queue.borrow_mut();
        let due = queue.now + delay;
        let seq = queue.seq;
        queue.seq += 1;
        queue.tasks.insert((due, seq), task);
        reflux_trace!("Scheduled task {} due at {:?}", seq, due);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn log_task(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> Task {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(label))
    }

    #[test]
    fn tasks_run_in_due_then_insertion_order() {
        let run_loop = RunLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        run_loop.schedule(Duration::from_millis(20), log_task(&log, "late"));
        run_loop.defer(log_task(&log, "first"));
        run_loop.defer(log_task(&log, "second"));
        run_loop.schedule(Duration::from_millis(10), log_task(&log, "early"));

        assert_eq!(run_loop.run_until_idle(), 4);
        assert_eq!(*log.borrow(), vec!["first", "second", "early", "late"]);
        assert_eq!(run_loop.now(), Duration::from_millis(20));
    }

    #[test]
    fn nothing_runs_inside_schedule() {
        let run_loop = RunLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        run_loop.defer(log_task(&log, "deferred"));

        assert!(log.borrow().is_empty());
        assert_eq!(run_loop.pending(), 1);
        assert_eq!(run_loop.run_ready(), 1);
        assert_eq!(*log.borrow(), vec!["deferred"]);
    }

    #[test]
    fn advance_only_runs_due_tasks() {
        let run_loop = RunLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        run_loop.schedule(Duration::from_millis(100), log_task(&log, "timer"));

        assert_eq!(run_loop.advance(Duration::from_millis(99)), 0);
        assert_eq!(run_loop.now(), Duration::from_millis(99));
        assert_eq!(run_loop.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.borrow(), vec!["timer"]);
    }

    #[test]
    fn tasks_may_schedule_more_tasks() {
        let run_loop = RunLoop::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_loop = run_loop.clone();
        let inner_log = Rc::clone(&log);
        run_loop.defer(Box::new(move || {
            inner_log.borrow_mut().push("outer");
            inner_loop.defer(log_task(&inner_log, "inner"));
        }));

        assert_eq!(run_loop.run_ready(), 2);
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }
}
