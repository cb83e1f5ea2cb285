use std::fmt;
use std::rc::{Rc, Weak};

use reflux_logging::{reflux_debug, reflux_trace};

/// Something a [`Handle`] can point at: a view model or an adapter around one.
pub(crate) trait Owner<S, E> {
    fn deliver(&self, event: E);
    fn current(&self) -> S;
    /// Number of transitions committed so far.
    fn revision(&self) -> u64;
}

/// Non-owning reference from a feedback back to the object that ran it.
///
/// A handle never keeps its owner alive. Once the owner is dropped every
/// call becomes a logged no-op.
///
/// The handle given to a feedback is pinned to the revision of the
/// transition that ran it. Clones keep the pin.
pub struct Handle<S, E> {
    owner: Weak<dyn Owner<S, E>>,
    pinned: Option<u64>,
}

impl<S, E> Clone for Handle<S, E> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            pinned: self.pinned,
        }
    }
}

impl<S, E> fmt::Debug for Handle<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("alive", &(self.owner.strong_count() > 0))
            .field("pinned", &self.pinned)
            .finish()
    }
}

impl<S, E> Handle<S, E>
where
    S: PartialEq + fmt::Debug,
    E: fmt::Debug,
{
    pub(crate) fn new(owner: Weak<dyn Owner<S, E>>) -> Self {
        Self {
            owner,
            pinned: None,
        }
    }

    pub(crate) fn pinned_to(mut self, revision: Option<u64>) -> Self {
        self.pinned = revision;
        self
    }

    /// Revision this handle was pinned to, if it was given to a feedback.
    pub fn revision(&self) -> Option<u64> {
        self.pinned
    }

    /// Sends `event` to the owner. Returns `false` if the owner is gone.
    pub fn receive(&self, event: E) -> bool {
        match self.owner.upgrade() {
            Some(owner) => {
                owner.deliver(event);
                true
            }
            None => {
                reflux_debug!("Dropping {:?}: view model no longer exists", event);
                false
            }
        }
    }

    /// Current committed state of the owner.
    pub fn state(&self) -> Option<S> {
        self.owner.upgrade().map(|owner| owner.current())
    }

    pub fn is_alive(&self) -> bool {
        self.owner.strong_count() > 0
    }

    /// Sends `event` only if the owner is still in `snapshot`.
    ///
    /// `snapshot` is the state that triggered the work producing `event`.
    /// If the owner has moved on, the result is stale and is discarded. A
    /// pinned handle also rejects the event once any later transition has
    /// committed, even one that came back to an equal state.
    pub fn receive_if_current(&self, snapshot: &S, event: E) -> bool {
        let Some(owner) = self.owner.upgrade() else {
            reflux_debug!("Dropping {:?}: view model no longer exists", event);
            return false;
        };
        if let Some(pinned) = self.pinned {
            let revision = owner.revision();
            if revision != pinned {
                reflux_debug!(
                    "Discarding stale {:?}: triggered at revision {}, now {}",
                    event,
                    pinned,
                    revision
                );
                return false;
            }
        }
        let current = owner.current();
        if current != *snapshot {
            reflux_debug!(
                "Discarding stale {:?}: triggered in {:?}, now {:?}",
                event,
                snapshot,
                current
            );
            return false;
        }
        owner.deliver(event);
        true
    }
}

type Effect<S, E> = dyn Fn(&Handle<S, E>, &S);

/// Side-effect handler run after every accepted transition.
///
/// The handler receives the post-transition state and decides for itself
/// whether to act. It must not mutate state except by sending events
/// through the handle.
pub struct Feedback<S, E> {
    name: &'static str,
    effect: Rc<Effect<S, E>>,
}

impl<S, E> Clone for Feedback<S, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            effect: Rc::clone(&self.effect),
        }
    }
}

impl<S, E> fmt::Debug for Feedback<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feedback").field("name", &self.name).finish()
    }
}

impl<S: 'static, E: 'static> Feedback<S, E> {
    pub fn new(name: &'static str, effect: impl Fn(&Handle<S, E>, &S) + 'static) -> Self {
        Self {
            name,
            effect: Rc::new(effect),
        }
    }

    /// Feedback that acts only when `select` matches the new state.
    ///
    /// ```
    /// # use reflux_core::Feedback;
    /// #[derive(Debug, Clone, PartialEq)]
    /// enum State { Idle, Saving(String) }
    /// #[derive(Debug)]
    /// enum Event { Saved }
    ///
    /// let save = Feedback::<State, Event>::on(
    ///     "save",
    ///     |state| match state {
    ///         State::Saving(text) => Some(text.clone()),
    ///         State::Idle => None,
    ///     },
    ///     |handle, _text| {
    ///         handle.receive(Event::Saved);
    ///     },
    /// );
    /// assert_eq!(save.name(), "save");
    /// ```
    pub fn on<T>(
        name: &'static str,
        select: impl Fn(&S) -> Option<T> + 'static,
        act: impl Fn(&Handle<S, E>, T) + 'static,
    ) -> Self {
        Self::new(name, move |handle, state| {
            if let Some(selected) = select(state) {
                act(handle, selected);
            }
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn run(&self, handle: &Handle<S, E>, state: &S) {
        reflux_trace!("Running feedback {}", self.name);
        (self.effect)(handle, state);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;

    struct Recorder {
        state: Cell<u32>,
        revision: Cell<u64>,
        received: RefCell<Vec<&'static str>>,
    }

    impl Owner<u32, &'static str> for Recorder {
        fn deliver(&self, event: &'static str) {
            self.received.borrow_mut().push(event);
        }

        fn current(&self) -> u32 {
            self.state.get()
        }

        fn revision(&self) -> u64 {
            self.revision.get()
        }
    }

    fn recorder(state: u32) -> Rc<Recorder> {
        Rc::new(Recorder {
            state: Cell::new(state),
            revision: Cell::new(0),
            received: RefCell::new(Vec::new()),
        })
    }

    fn handle_for(owner: &Rc<Recorder>) -> Handle<u32, &'static str> {
        let weak: Weak<Recorder> = Rc::downgrade(owner);
        Handle::new(weak)
    }

    #[test]
    fn receive_if_current_checks_snapshot() {
        let owner = recorder(1);
        let handle = handle_for(&owner);

        assert!(handle.receive_if_current(&1, "fresh"));
        owner.state.set(2);
        assert!(!handle.receive_if_current(&1, "stale"));
        assert_eq!(*owner.received.borrow(), vec!["fresh"]);
    }

    #[test]
    fn pinned_handle_rejects_a_returning_state() {
        let owner = recorder(1);
        let handle = handle_for(&owner).pinned_to(Some(0));
        assert_eq!(handle.clone().revision(), Some(0));

        // Left state 1 and came back to it.
        owner.revision.set(2);
        assert!(!handle.receive_if_current(&1, "stale"));
        assert!(handle_for(&owner).receive_if_current(&1, "unpinned"));
        assert_eq!(*owner.received.borrow(), vec!["unpinned"]);
    }

    #[test]
    fn handle_does_not_keep_owner_alive() {
        let owner = recorder(0);
        let handle = handle_for(&owner);
        assert!(handle.is_alive());
        assert_eq!(handle.state(), Some(0));

        drop(owner);
        assert!(!handle.is_alive());
        assert_eq!(handle.state(), None);
        assert!(!handle.receive("late"));
        assert!(!handle.receive_if_current(&0, "late"));
    }

    #[test]
    fn selective_feedback_ignores_unmatched_states() {
        let owner = recorder(0);
        let handle = handle_for(&owner);
        let feedback = Feedback::on(
            "even",
            |state: &u32| (state % 2 == 0).then_some(*state),
            |handle: &Handle<u32, &'static str>, _| {
                handle.receive("even");
            },
        );

        feedback.run(&handle, &3);
        feedback.run(&handle, &4);
        assert_eq!(*owner.received.borrow(), vec!["even"]);
    }
}
