//! Reflux core: reducer contract, feedback dispatch and the view-model event loop.
//!
//! A view model owns exactly one state value. Events enter through
//! [`ViewModel::receive`], are folded into a new state by a pure
//! [`Reducer`], and every accepted transition runs the machine's
//! [`Feedback`]s before the change callback fires. Feedbacks talk back to
//! their owner through a weak [`Handle`], usually from a task deferred on a
//! [`Scheduler`].
//!
//! [`AnyViewModel`] erases the concrete machine type so front-ends can
//! observe any view model through one [`Observable`] slot.
mod adapter;
mod error;
mod feedback;
mod observable;
mod reducer;
mod scheduler;
mod view_model;

pub use adapter::{AnyViewModel, ErasedViewModel};
pub use error::ErrorDescription;
pub use feedback::{Feedback, Handle};
pub use observable::{Observable, Subscription, WeakObservable};
pub use reducer::Reducer;
pub use scheduler::{RunLoop, Scheduler, Task};
pub use view_model::{ChangeCallback, Machine, ViewModel};
