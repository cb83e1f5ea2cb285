//! Line-oriented front-end: parses typed commands and renders list states.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use reflux_core::Subscription;
use reflux_logging::{reflux_info, reflux_warn};
use thiserror::Error;

use crate::list::{AnyListViewModel, ListEvent, ListState};

pub const HELP: &str = "commands: add, refresh, cancel, help, quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(ListEvent),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command {0:?}, type `help` for the list")]
pub struct UnknownCommand(pub String);

pub fn parse_command(line: &str) -> Result<Command, UnknownCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "add" | "a" => Ok(Command::Send(ListEvent::Add)),
        "refresh" | "r" => Ok(Command::Send(ListEvent::Refresh)),
        "cancel" | "c" => Ok(Command::Send(ListEvent::Cancel)),
        "help" | "?" | "" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(UnknownCommand(line.trim().to_string())),
    }
}

pub fn render(state: &ListState) -> String {
    match state {
        ListState::Empty => "[empty] type `add` to load an item".to_string(),
        ListState::Loading { items } if items.is_empty() => "[loading] ...".to_string(),
        ListState::Loading { items } => format!("[loading] {}, ...", items.join(", ")),
        ListState::Loaded(items) => format!("[{} items] {}", items.len(), items.join(", ")),
        ListState::Error(err) => format!("[error] {err} (type `refresh` to reset)"),
    }
}

/// Writes one rendered line to `out` for the current state and every change.
pub fn attach_status_line<W: Write + 'static>(
    view_model: &AnyListViewModel,
    out: Rc<RefCell<W>>,
) -> Subscription {
    view_model.subscribe_with_current(move |state| {
        let mut out = out.borrow_mut();
        if let Err(err) = writeln!(out, "{}", render(state)).and_then(|()| out.flush()) {
            reflux_warn!("Failed to write status line: {}", err);
        }
    })
}

/// Logs every state the view model enters.
pub fn attach_transition_log(view_model: &AnyListViewModel) -> Subscription {
    view_model.subscribe(|state| {
        reflux_info!(
            "List now {:?} ({} items)",
            state,
            state.items().len()
        );
    })
}
