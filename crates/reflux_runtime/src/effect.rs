use std::fmt::Debug;
use std::future::Future;

use reflux_core::Handle;
use reflux_logging::reflux_trace;
use tokio::task::JoinHandle;

/// Runs `work` on the local executor and feeds its outcome back as an event.
///
/// `snapshot` is the state that triggered the work. The event is delivered
/// only if the owner is still alive and still in that state; the join
/// handle resolves to whether it was.
pub fn spawn_effect<S, E, T, F>(
    handle: &Handle<S, E>,
    snapshot: S,
    work: F,
    into_event: impl FnOnce(T) -> E + 'static,
) -> JoinHandle<bool>
where
    S: PartialEq + Debug + 'static,
    E: Debug + 'static,
    T: 'static,
    F: Future<Output = T> + 'static,
{
    let handle = handle.clone();
    tokio::task::spawn_local(async move {
        let output = work.await;
        let turn = reflux_logging::next_turn();
        reflux_trace!("Effect for {:?} finished on turn {}", snapshot, turn);
        handle.receive_if_current(&snapshot, into_event(output))
    })
}
