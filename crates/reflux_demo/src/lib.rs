//! Reflux demo: a list screen driven by the reflux event loop.
//!
//! Each `add` puts the list into a loading state; a feedback fetches the next
//! value from a [`ValueSource`](source::ValueSource) after a delay and feeds
//! the result (or the failure) back as an event.
pub mod config;
pub mod console;
pub mod list;
pub mod source;
