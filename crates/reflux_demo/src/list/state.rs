use reflux_core::ErrorDescription;

/// State of the list screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    /// Nothing loaded yet.
    #[default]
    Empty,

    /// Waiting for the next value.
    Loading {
        /// Items loaded before this request; kept so a failed or cancelled
        /// add from a populated list does not lose them.
        items: Vec<String>,
    },

    /// At least one value loaded.
    Loaded(Vec<String>),

    /// The last add failed.
    Error(ErrorDescription),
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Items visible in this state.
    pub fn items(&self) -> &[String] {
        match self {
            Self::Loading { items } | Self::Loaded(items) => items,
            Self::Empty | Self::Error(_) => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(err) => Some(err.as_str()),
            _ => None,
        }
    }

    /// 1-based number of the value a loading state is waiting for.
    ///
    /// `None` outside `Loading`, and when the number does not fit in a `u32`.
    pub fn pending_sequence(&self) -> Option<u32> {
        match self {
            Self::Loading { items } => sequence_after(items.len()),
            _ => None,
        }
    }
}

fn sequence_after(loaded: usize) -> Option<u32> {
    u32::try_from(loaded).ok()?.checked_add(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_default() {
        assert_eq!(ListState::default(), ListState::Empty);
    }

    #[test]
    fn items_are_visible_while_loading() {
        let state = ListState::Loading {
            items: vec!["a".into()],
        };
        assert!(state.is_loading());
        assert_eq!(state.items(), &["a".to_string()]);
        assert_eq!(state.pending_sequence(), Some(2));
    }

    #[test]
    fn error_message_only_in_error() {
        assert_eq!(ListState::Empty.error_message(), None);
        assert_eq!(
            ListState::Error("boom".into()).error_message(),
            Some("boom")
        );
        assert_eq!(ListState::Loaded(vec![]).pending_sequence(), None);
    }

    #[test]
    fn sequence_never_wraps() {
        assert_eq!(sequence_after(0), Some(1));
        assert_eq!(sequence_after(u32::MAX as usize - 1), Some(u32::MAX));
        assert_eq!(sequence_after(u32::MAX as usize), None);
        assert_eq!(sequence_after(usize::MAX), None);
    }
}
