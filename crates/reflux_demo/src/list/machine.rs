use std::rc::Rc;

use reflux_core::{AnyViewModel, Feedback, Handle, Machine, Reducer, ViewModel};
use reflux_logging::{reflux_debug, reflux_warn};

use super::event::ListEvent;
use super::loader::Loader;
use super::reducer::ListReducer;
use super::state::ListState;

pub type ListViewModel<L> = ViewModel<ListMachine<L>>;

/// What front-ends hold: any list view model, whatever its loader.
pub type AnyListViewModel = AnyViewModel<ListState, ListEvent>;

/// List screen: [`ListReducer`] plus feedbacks that fetch through `L`.
pub struct ListMachine<L> {
    loader: Rc<L>,
}

impl<L: Loader> ListMachine<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Rc::new(loader),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: Loader> Reducer for ListMachine<L> {
    type State = ListState;
    type Event = ListEvent;

    fn initial_state() -> ListState {
        ListReducer::initial_state()
    }

    fn reduce(state: ListState, event: ListEvent) -> ListState {
        ListReducer::reduce(state, event)
    }
}

impl<L: Loader> Machine for ListMachine<L> {
    fn feedbacks(&self) -> Vec<Feedback<ListState, ListEvent>> {
        let loader = Rc::clone(&self.loader);
        vec![
            Feedback::on(
                "load_value",
                |state: &ListState| state.pending_sequence().map(|seq| (state.clone(), seq)),
                move |handle: &Handle<ListState, ListEvent>, (snapshot, sequence): (ListState, u32)| {
                    reflux_debug!("Requesting value {}", sequence);
                    loader.load(handle, snapshot, sequence);
                },
            ),
            Feedback::on(
                "log_errors",
                |state: &ListState| state.error_message().map(str::to_owned),
                |_, message: String| {
                    reflux_warn!("Adding an item failed: {}", message);
                },
            ),
        ]
    }
}
