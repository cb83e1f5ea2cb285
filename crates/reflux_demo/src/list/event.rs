use reflux_core::ErrorDescription;

/// Events the list screen reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// User asked for one more item.
    Add,

    /// The source produced the requested value.
    NewValueLoaded(String),

    /// The source failed to produce a value.
    FailedToAdd(ErrorDescription),

    /// User asked to start over.
    Refresh,

    /// User gave up on the pending add.
    Cancel,
}
