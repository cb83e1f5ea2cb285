use std::cell::Cell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use reflux_logging::reflux_debug;

use crate::feedback::{Feedback, Handle, Owner};
use crate::observable::{Observable, Subscription};
use crate::view_model::{ChangeCallback, Machine, ViewModel};

/// Capability set every view model exposes, independent of its machine type.
pub trait ErasedViewModel<S, E> {
    fn state(&self) -> S;
    fn receive(&self, event: E);
    fn revision(&self) -> u64;
    fn set_on_change(&self, callback: Option<ChangeCallback<S>>);
    /// Clears the change callback only if it is still `callback`.
    fn clear_on_change_if(&self, callback: &ChangeCallback<S>) -> bool;
    fn feedbacks(&self) -> Vec<Feedback<S, E>>;
}

impl<M: Machine> ErasedViewModel<M::State, M::Event> for ViewModel<M> {
    fn state(&self) -> M::State {
        ViewModel::state(self)
    }

    fn receive(&self, event: M::Event) {
        ViewModel::receive(self, event);
    }

    fn revision(&self) -> u64 {
        ViewModel::revision(self)
    }

    fn set_on_change(&self, callback: Option<ChangeCallback<M::State>>) {
        self.set_change_callback(callback);
    }

    fn clear_on_change_if(&self, callback: &ChangeCallback<M::State>) -> bool {
        ViewModel::clear_on_change_if(self, callback)
    }

    fn feedbacks(&self) -> Vec<Feedback<M::State, M::Event>> {
        ViewModel::feedbacks(self)
    }
}

struct Shared<S, E> {
    wrapped: Rc<dyn ErasedViewModel<S, E>>,
    installed: ChangeCallback<S>,
    slot: Observable<S>,
    disposed: Cell<bool>,
}

impl<S, E> Shared<S, E> {
    fn dispose(&self) -> bool {
        if self.disposed.replace(true) {
            return false;
        }
        if !self.wrapped.clear_on_change_if(&self.installed) {
            reflux_debug!("Change callback was already replaced; leaving it in place");
        }
        true
    }
}

impl<S, E> Drop for Shared<S, E> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S, E> Owner<S, E> for Shared<S, E> {
    fn deliver(&self, event: E) {
        self.wrapped.receive(event);
    }

    fn current(&self) -> S {
        self.wrapped.state()
    }

    fn revision(&self) -> u64 {
        self.wrapped.revision()
    }
}

/// Type-erased view model for presentation layers.
///
/// Mirrors the wrapped view model's state into an [`Observable`] that any
/// number of front-ends can subscribe to, and forwards events unchanged.
/// The adapter takes over the wrapped view model's single change-callback
/// slot. Dropping the last clone of the adapter disposes it; disposal leaves
/// the slot alone if something else has been installed since.
pub struct AnyViewModel<S, E> {
    shared: Rc<Shared<S, E>>,
}

impl<S, E> Clone for AnyViewModel<S, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<S: Clone + Debug + 'static, E> Debug for AnyViewModel<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyViewModel")
            .field("state", &self.shared.slot.get())
            .field("disposed", &self.shared.disposed.get())
            .finish()
    }
}

impl<S, E> AnyViewModel<S, E>
where
    S: Clone + PartialEq + Debug + 'static,
    E: Debug + 'static,
{
    pub fn new(view_model: impl ErasedViewModel<S, E> + 'static) -> Self {
        let wrapped: Rc<dyn ErasedViewModel<S, E>> = Rc::new(view_model);
        let slot = Observable::new(wrapped.state());

        let target = slot.downgrade();
        let installed: ChangeCallback<S> = Rc::new(move |_old: &S, new: &S| {
            if let Some(slot) = target.upgrade() {
                slot.set(new.clone());
            }
        });
        wrapped.set_on_change(Some(Rc::clone(&installed)));

        Self {
            shared: Rc::new(Shared {
                wrapped,
                installed,
                slot,
                disposed: Cell::new(false),
            }),
        }
    }

    /// Last state mirrored from the wrapped view model.
    pub fn state(&self) -> S {
        self.shared.slot.get()
    }

    /// Forwards `event` to the wrapped view model.
    pub fn receive(&self, event: E) {
        self.shared.wrapped.receive(event);
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        self.shared.slot.subscribe(listener)
    }

    pub fn subscribe_with_current(&self, listener: impl Fn(&S) + 'static) -> Subscription {
        self.shared.slot.subscribe_with_current(listener)
    }

    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.shared.slot.unsubscribe(subscription)
    }

    pub fn observable(&self) -> Observable<S> {
        self.shared.slot.clone()
    }

    /// Weak handle that targets the adapter rather than the wrapped view model.
    pub fn handle(&self) -> Handle<S, E> {
        let shared: Weak<Shared<S, E>> = Rc::downgrade(&self.shared);
        let owner: Weak<dyn Owner<S, E>> = shared;
        Handle::new(owner)
    }

    /// The wrapped view model's feedbacks, rebound so that whatever they
    /// send goes through this adapter. The handle a rebound feedback is run
    /// with only contributes its revision pin.
    pub fn feedbacks(&self) -> Vec<Feedback<S, E>> {
        let handle = self.handle();
        self.shared
            .wrapped
            .feedbacks()
            .into_iter()
            .map(|feedback| {
                let handle = handle.clone();
                Feedback::new(feedback.name(), move |given: &Handle<S, E>, state: &S| {
                    let pinned = handle.clone().pinned_to(given.revision());
                    feedback.run(&pinned, state)
                })
            })
            .collect()
    }

    /// Stops mirroring and releases the wrapped view model's change-callback
    /// slot. Safe to call more than once.
    pub fn dispose(&self) {
        if self.shared.dispose() {
            reflux_debug!("Disposed view model adapter in {:?}", self.state());
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.disposed.get()
    }
}

impl<M: Machine> From<ViewModel<M>> for AnyViewModel<M::State, M::Event> {
    fn from(view_model: ViewModel<M>) -> Self {
        Self::new(view_model)
    }
}
