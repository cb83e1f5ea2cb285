use std::fmt::Debug;

/// Pure state transition: `(State, Event) -> State`.
///
/// `reduce` takes no `self`, so a transition can never depend on instance
/// data. Every (state, event) pair must map to a result; pairs with no
/// meaning return the input state unchanged, which the event loop treats as
/// a no-op.
pub trait Reducer {
    /// Single source of truth for one view model. One variant is active at a time.
    type State: Clone + PartialEq + Debug + 'static;

    /// Something that happened. The only trigger for a state change.
    type Event: Debug + 'static;

    /// State a freshly constructed view model starts in.
    fn initial_state() -> Self::State;

    /// Computes the next state. Must be free of side effects.
    fn reduce(state: Self::State, event: Self::Event) -> Self::State;

    /// Reduces and returns the new state only if it differs from `state`.
    fn transition(state: &Self::State, event: Self::Event) -> Option<Self::State> {
        let next = Self::reduce(state.clone(), event);
        if next == *state {
            None
        } else {
            Some(next)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Light {
        Off,
        On { level: u8 },
    }

    #[derive(Debug)]
    enum Switch {
        Toggle,
        Dim,
    }

    struct LightReducer;

    impl Reducer for LightReducer {
        type State = Light;
        type Event = Switch;

        fn initial_state() -> Light {
            Light::Off
        }

        fn reduce(state: Light, event: Switch) -> Light {
            match (state, event) {
                (Light::Off, Switch::Toggle) => Light::On { level: 3 },
                (Light::On { .. }, Switch::Toggle) => Light::Off,
                (Light::On { level }, Switch::Dim) => Light::On {
                    level: level.saturating_sub(1),
                },
                (state, Switch::Dim) => state,
            }
        }
    }

    #[test]
    fn transition_reports_changes_only() {
        assert_eq!(
            LightReducer::transition(&Light::Off, Switch::Toggle),
            Some(Light::On { level: 3 })
        );
        assert_eq!(LightReducer::transition(&Light::Off, Switch::Dim), None);
        assert_eq!(
            LightReducer::transition(&Light::On { level: 0 }, Switch::Dim),
            None
        );
    }

    #[test]
    fn reduce_is_repeatable() {
        let first = LightReducer::reduce(Light::On { level: 2 }, Switch::Dim);
        let second = LightReducer::reduce(Light::On { level: 2 }, Switch::Dim);
        assert_eq!(first, second);
        assert_eq!(LightReducer::initial_state(), Light::Off);
    }
}
