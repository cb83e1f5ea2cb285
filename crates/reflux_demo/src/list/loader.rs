use std::rc::Rc;
use std::time::Duration;

use reflux_core::{ErrorDescription, Handle, Scheduler};
use reflux_runtime::spawn_effect;

use super::event::ListEvent;
use super::state::ListState;
use crate::source::{ScriptedSource, SourceError, ValueSource};

/// Starts fetching one value for a list waiting in `snapshot`.
///
/// Implementations answer later, through `handle`, and must drop the answer
/// if the list has left `snapshot` by then.
pub trait Loader: 'static {
    fn load(&self, handle: &Handle<ListState, ListEvent>, snapshot: ListState, sequence: u32);
}

/// Loads synchronously from a [`ScriptedSource`] after `delay` on any scheduler.
#[derive(Debug)]
pub struct ScheduledLoader<S> {
    scheduler: S,
    source: ScriptedSource,
    delay: Duration,
}

impl<S: Scheduler + 'static> ScheduledLoader<S> {
    pub fn new(scheduler: S, source: ScriptedSource, delay: Duration) -> Self {
        Self {
            scheduler,
            source,
            delay,
        }
    }
}

impl<S: Scheduler + 'static> Loader for ScheduledLoader<S> {
    fn load(&self, handle: &Handle<ListState, ListEvent>, snapshot: ListState, sequence: u32) {
        let handle = handle.clone();
        let source = self.source.clone();
        self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                let event = into_event(source.value_for(sequence));
                handle.receive_if_current(&snapshot, event);
            }),
        );
    }
}

/// Loads from any [`ValueSource`] on the tokio local executor.
pub struct AsyncLoader {
    source: Rc<dyn ValueSource>,
    delay: Duration,
}

impl AsyncLoader {
    pub fn new(source: Rc<dyn ValueSource>, delay: Duration) -> Self {
        Self { source, delay }
    }
}

impl Loader for AsyncLoader {
    fn load(&self, handle: &Handle<ListState, ListEvent>, snapshot: ListState, sequence: u32) {
        let source = Rc::clone(&self.source);
        let delay = self.delay;
        let _detached = spawn_effect(
            handle,
            snapshot,
            async move {
                tokio::time::sleep(delay).await;
                source.load(sequence).await
            },
            into_event,
        );
    }
}

fn into_event(result: Result<String, SourceError>) -> ListEvent {
    match result {
        Ok(value) => ListEvent::NewValueLoaded(value),
        Err(err) => ListEvent::FailedToAdd(ErrorDescription::new(err)),
    }
}
