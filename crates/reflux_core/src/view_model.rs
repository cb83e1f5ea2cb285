use std::cell::{Cell, OnceCell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use reflux_logging::{reflux_debug, reflux_trace};

use crate::feedback::{Feedback, Handle, Owner};
use crate::reducer::Reducer;

/// Called with `(old, new)` after every accepted transition.
pub type ChangeCallback<S> = Rc<dyn Fn(&S, &S)>;

/// Application-supplied description of a view model: a reducer plus the
/// feedbacks that react to its states.
///
/// The machine owns whatever its feedbacks need (a scheduler, a data
/// source). [`feedbacks`](Machine::feedbacks) is called once, lazily, and
/// the list is fixed from then on.
pub trait Machine: Reducer + 'static {
    fn feedbacks(&self) -> Vec<Feedback<Self::State, Self::Event>>;
}

struct Core<M: Machine> {
    me: Weak<Core<M>>,
    machine: M,
    state: RefCell<M::State>,
    revision: Cell<u64>,
    feedbacks: OnceCell<Vec<Feedback<M::State, M::Event>>>,
    on_change: RefCell<Option<ChangeCallback<M::State>>>,
    inbox: RefCell<VecDeque<M::Event>>,
    draining: Cell<bool>,
}

impl<M: Machine> Core<M> {
    fn handle(&self) -> Handle<M::State, M::Event> {
        let me: Weak<dyn Owner<M::State, M::Event>> = self.me.clone();
        Handle::new(me)
    }

    fn feedbacks(&self) -> &[Feedback<M::State, M::Event>] {
        self.feedbacks.get_or_init(|| {
            let feedbacks = self.machine.feedbacks();
            reflux_trace!("Installed {} feedbacks", feedbacks.len());
            feedbacks
        })
    }

    fn receive(&self, event: M::Event) {
        self.inbox.borrow_mut().push_back(event);
        if self.draining.get() {
            reflux_trace!("Queued reentrant event behind the current transition");
            return;
        }

        self.draining.set(true);
        let _draining = scopeguard::guard((), |()| self.draining.set(false));
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            let Some(event) = next else {
                break;
            };
            self.step(event);
        }
    }

    fn step(&self, event: M::Event) {
        let old = self.state.borrow().clone();
        reflux_trace!("Reducing {:?} in {:?}", event, old);
        let Some(new) = M::transition(&old, event) else {
            reflux_trace!("No-op in {:?}", old);
            return;
        };

        let revision = self.revision.get() + 1;
        let handle = self.handle().pinned_to(Some(revision));
        for feedback in self.feedbacks() {
            feedback.run(&handle, &new);
        }

        *self.state.borrow_mut() = new.clone();
        self.revision.set(revision);
        reflux_debug!("Transition {} {:?} -> {:?}", revision, old, new);

        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback(&old, &new);
        }
    }
}

impl<M: Machine> Owner<M::State, M::Event> for Core<M> {
    fn deliver(&self, event: M::Event) {
        self.receive(event);
    }

    fn current(&self) -> M::State {
        self.state.borrow().clone()
    }

    fn revision(&self) -> u64 {
        self.revision.get()
    }
}

/// Owns the current state and drives reduce, feedback dispatch and notify.
///
/// Events received while a transition is being processed (from a feedback
/// or from the change callback) are queued and handled, in order, after
/// that transition has committed and notified. Feedbacks see the new state
/// as an argument; [`state`](ViewModel::state) only reflects it after all
/// feedbacks have run.
///
/// Cloning yields another handle to the same view model.
pub struct ViewModel<M: Machine> {
    core: Rc<Core<M>>,
}

impl<M: Machine> Clone for ViewModel<M> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<M: Machine> fmt::Debug for ViewModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("state", &*self.core.state.borrow())
            .field("queued", &self.core.inbox.borrow().len())
            .finish()
    }
}

impl<M: Machine> ViewModel<M> {
    pub fn new(machine: M) -> Self {
        Self::with_state(machine, M::initial_state())
    }

    pub fn with_state(machine: M, state: M::State) -> Self {
        let core = Rc::new_cyclic(|me| Core {
            me: me.clone(),
            machine,
            state: RefCell::new(state),
            revision: Cell::new(0),
            feedbacks: OnceCell::new(),
            on_change: RefCell::new(None),
            inbox: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        });
        Self { core }
    }

    pub fn state(&self) -> M::State {
        self.core.state.borrow().clone()
    }

    /// Number of transitions committed since construction.
    pub fn revision(&self) -> u64 {
        self.core.revision.get()
    }

    /// Sole mutation entry point. Never fails.
    pub fn receive(&self, event: M::Event) {
        self.core.receive(event);
    }

    /// Installs the change callback, replacing any previous one.
    pub fn on_change(&self, callback: impl Fn(&M::State, &M::State) + 'static) {
        self.set_change_callback(Some(Rc::new(callback)));
    }

    pub fn clear_on_change(&self) {
        self.set_change_callback(None);
    }

    pub fn set_change_callback(&self, callback: Option<ChangeCallback<M::State>>) {
        *self.core.on_change.borrow_mut() = callback;
    }

    /// Clears the change callback only if it is still `callback`.
    pub fn clear_on_change_if(&self, callback: &ChangeCallback<M::State>) -> bool {
        let mut slot = self.core.on_change.borrow_mut();
        match &*slot {
            Some(installed) if Rc::ptr_eq(installed, callback) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn has_change_callback(&self) -> bool {
        self.core.on_change.borrow().is_some()
    }

    /// Weak handle to this view model, as passed to its feedbacks.
    pub fn handle(&self) -> Handle<M::State, M::Event> {
        self.core.handle()
    }

    pub fn feedbacks(&self) -> Vec<Feedback<M::State, M::Event>> {
        self.core.feedbacks().to_vec()
    }

    pub fn machine(&self) -> &M {
        &self.core.machine
    }
}
