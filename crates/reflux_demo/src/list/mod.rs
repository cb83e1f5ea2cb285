//! List screen.
//!
//! - `state.rs` - list state enum
//! - `event.rs` - user/system events
//! - `reducer.rs` - state transitions
//! - `machine.rs` - feedbacks wired to a loader
//! - `loader.rs` - how the next value is fetched (run loop or tokio)

mod event;
mod loader;
mod machine;
mod reducer;
mod state;

pub use event::ListEvent;
pub use loader::{AsyncLoader, Loader, ScheduledLoader};
pub use machine::{AnyListViewModel, ListMachine, ListViewModel};
pub use reducer::ListReducer;
pub use state::ListState;
