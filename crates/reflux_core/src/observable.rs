use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

type Listener<T> = Rc<dyn Fn(&T)>;

/// Source of slot keys. Keys are never reused.
static NEXT_SLOT: AtomicU64 = AtomicU64::new(0);

struct Slot<T> {
    key: u64,
    value: RefCell<T>,
    listeners: RefCell<Vec<(u64, Listener<T>)>>,
    next_id: Cell<u64>,
}

/// Opaque token for one registered listener. Only good for unsubscribing.
#[must_use = "a subscription can only be removed through its token"]
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription {
    slot: u64,
    id: u64,
}

/// Shared value slot that broadcasts every replacement to its listeners.
///
/// Listeners run synchronously, in registration order, on the thread that
/// calls [`set`](Observable::set). Clones share the same slot.
pub struct Observable<T> {
    slot: Rc<Slot<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &*self.slot.value.borrow())
            .field("listeners", &self.slot.listeners.borrow().len())
            .finish()
    }
}

impl<T: Clone + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(Slot {
                key: NEXT_SLOT.fetch_add(1, Ordering::Relaxed),
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.slot.value.borrow().clone()
    }

    /// Borrows the current value without cloning it.
    ///
    /// Calling [`set`](Observable::set) from inside `f` panics.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.slot.value.borrow();
        f(&*value)
    }

    /// Replaces the value and notifies listeners.
    pub fn set(&self, value: T) {
        self.replace(value);
    }

    /// Replaces the value, notifies listeners and returns the previous value.
    ///
    /// A listener that unsubscribes another listener during notification
    /// prevents that listener from being called. Listeners added during
    /// notification wait for the next change. Each listener sees the value
    /// current at the moment it is called.
    pub fn replace(&self, value: T) -> T {
        let previous = std::mem::replace(&mut *self.slot.value.borrow_mut(), value);
        self.notify();
        previous
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.slot.next_id.get();
        self.slot.next_id.set(id + 1);
        self.slot
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            slot: self.slot.key,
            id,
        }
    }

    /// Registers `listener` and immediately calls it with the current value.
    pub fn subscribe_with_current(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let subscription = self.subscribe(listener);
        let registered = self.listener(subscription.id);
        if let Some(listener) = registered {
            let value = self.get();
            listener(&value);
        }
        subscription
    }

    /// Removes a listener. Returns `false` if the token was already used or
    /// belongs to another observable.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        if subscription.slot != self.slot.key {
            return false;
        }
        let mut listeners = self.slot.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.slot.listeners.borrow().len()
    }

    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            slot: Rc::downgrade(&self.slot),
        }
    }

    fn notify(&self) {
        let ids: Vec<u64> = self.slot.listeners.borrow().iter().map(|(id, _)| *id).collect();
        for id in ids {
            let Some(listener) = self.listener(id) else {
                continue;
            };
            let value = self.get();
            listener(&value);
        }
    }

    fn listener(&self, id: u64) -> Option<Listener<T>> {
        self.slot
            .listeners
            .borrow()
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, listener)| Rc::clone(listener))
    }
}

/// Non-owning reference to an [`Observable`].
pub struct WeakObservable<T> {
    slot: Weak<Slot<T>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T> WeakObservable<T> {
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.slot.upgrade().map(|slot| Observable { slot })
    }
}
