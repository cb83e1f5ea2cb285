use std::error::Error;
use std::fmt;
use std::rc::Rc;

/// Error payload that can live inside a state or event.
///
/// Arbitrary error types rarely implement `PartialEq`, yet states must be
/// comparable. Two descriptions are equal when their rendered messages are
/// equal; the original error is kept for inspection.
#[derive(Clone)]
pub struct ErrorDescription {
    message: Rc<str>,
    source: Option<Rc<dyn Error + 'static>>,
}

impl ErrorDescription {
    /// Captures `err` and its `Display` output.
    pub fn new<E: Error + 'static>(err: E) -> Self {
        Self {
            message: err.to_string().into(),
            source: Some(Rc::new(err)),
        }
    }

    /// A description with no underlying error value.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into().into(),
            source: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.message
    }

    /// The wrapped error, if one was captured.
    pub fn source_error(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.source_error()?.downcast_ref::<E>()
    }
}

impl PartialEq for ErrorDescription {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl Eq for ErrorDescription {}

impl fmt::Display for ErrorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for ErrorDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErrorDescription").field(&&*self.message).finish()
    }
}

impl Error for ErrorDescription {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source_error()
    }
}

impl From<&str> for ErrorDescription {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

impl From<String> for ErrorDescription {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Timeout(u32);

    impl fmt::Display for Timeout {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "timed out after {}ms", self.0)
        }
    }

    impl Error for Timeout {}

    #[test]
    fn equality_follows_description() {
        let a = ErrorDescription::new(Timeout(50));
        let b = ErrorDescription::new(Timeout(50));
        let c = ErrorDescription::new(Timeout(80));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ErrorDescription::from("timed out after 50ms"));
    }

    #[test]
    fn original_error_can_be_recovered() {
        let err = ErrorDescription::new(Timeout(7));
        assert_eq!(err.downcast_ref::<Timeout>().map(|t| t.0), Some(7));
        assert!(ErrorDescription::message("plain").source_error().is_none());
        assert_eq!(format!("{err:?}"), "ErrorDescription(\"timed out after 7ms\")");
    }
}
