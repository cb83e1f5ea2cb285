use reflux_core::Reducer;

use super::event::ListEvent;
use super::state::ListState;

/// Transitions of the list screen.
pub struct ListReducer;

impl Reducer for ListReducer {
    type State = ListState;
    type Event = ListEvent;

    fn initial_state() -> ListState {
        ListState::Empty
    }

    fn reduce(state: ListState, event: ListEvent) -> ListState {
        match (state, event) {
            (ListState::Empty | ListState::Error(_), ListEvent::Add) => {
                ListState::Loading { items: Vec::new() }
            }
            (ListState::Loaded(items), ListEvent::Add) => ListState::Loading { items },

            (ListState::Loading { mut items }, ListEvent::NewValueLoaded(value)) => {
                items.push(value);
                ListState::Loaded(items)
            }
            (ListState::Loading { .. }, ListEvent::FailedToAdd(err)) => ListState::Error(err),

            (ListState::Loading { items }, ListEvent::Cancel) => {
                if items.is_empty() {
                    ListState::Empty
                } else {
                    ListState::Loaded(items)
                }
            }

            // A refresh cannot interrupt a pending add.
            (state @ ListState::Loading { .. }, ListEvent::Refresh) => state,
            (ListState::Loaded(_) | ListState::Error(_), ListEvent::Refresh) => ListState::Empty,

            (state, _) => state,
        }
    }
}
