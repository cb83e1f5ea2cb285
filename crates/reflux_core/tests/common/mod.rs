#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;
use std::time::Duration;

use reflux_core::{ErrorDescription, Feedback, Handle, Machine, Reducer, RunLoop, Scheduler};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(reflux_logging::initialize_for_tests);
}

pub const FETCH_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading { query: String },
    Ready { query: String, rows: Vec<String> },
    Failed(ErrorDescription),
}

#[derive(Debug, Clone)]
pub enum Input {
    Search(String),
    Loaded(Vec<String>),
    Failed(ErrorDescription),
    Reset,
}

pub type Journal = Rc<RefCell<Vec<String>>>;

/// Search screen whose fetch feedback answers after `FETCH_DELAY` on the run loop.
pub struct SearchMachine {
    pub run_loop: RunLoop,
    pub journal: Journal,
}

impl SearchMachine {
    pub fn new(run_loop: &RunLoop) -> (Self, Journal) {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let machine = Self {
            run_loop: run_loop.clone(),
            journal: Rc::clone(&journal),
        };
        (machine, journal)
    }
}

impl Reducer for SearchMachine {
    type State = Phase;
    type Event = Input;

    fn initial_state() -> Phase {
        Phase::Idle
    }

    fn reduce(state: Phase, event: Input) -> Phase {
        match (state, event) {
            (_, Input::Reset) => Phase::Idle,
            (_, Input::Search(query)) => Phase::Loading { query },
            (Phase::Loading { query }, Input::Loaded(rows)) => Phase::Ready { query, rows },
            (Phase::Loading { .. }, Input::Failed(err)) => Phase::Failed(err),
            (state, Input::Loaded(_) | Input::Failed(_)) => state,
        }
    }
}

impl Machine for SearchMachine {
    fn feedbacks(&self) -> Vec<Feedback<Phase, Input>> {
        let first_journal = Rc::clone(&self.journal);
        let second_journal = Rc::clone(&self.journal);
        let run_loop = self.run_loop.clone();
        vec![
            Feedback::new("journal_first", move |_, state: &Phase| {
                first_journal
                    .borrow_mut()
                    .push(format!("first:{}", label(state)));
            }),
            Feedback::on(
                "fetch",
                |state: &Phase| match state {
                    Phase::Loading { query } => Some((state.clone(), query.clone())),
                    _ => None,
                },
                move |handle: &Handle<Phase, Input>, (snapshot, query): (Phase, String)| {
                    let handle = handle.clone();
                    run_loop.schedule(
                        FETCH_DELAY,
                        Box::new(move || {
                            let rows = vec![format!("{query}-1")];
                            handle.receive_if_current(&snapshot, Input::Loaded(rows));
                        }),
                    );
                },
            ),
            Feedback::new("journal_second", move |_, state: &Phase| {
                second_journal
                    .borrow_mut()
                    .push(format!("second:{}", label(state)));
            }),
        ]
    }
}

pub fn label(state: &Phase) -> &'static str {
    match state {
        Phase::Idle => "idle",
        Phase::Loading { .. } => "loading",
        Phase::Ready { .. } => "ready",
        Phase::Failed(_) => "failed",
    }
}

pub fn loading(query: &str) -> Phase {
    Phase::Loading {
        query: query.to_string(),
    }
}

pub fn ready(query: &str, rows: &[&str]) -> Phase {
    Phase::Ready {
        query: query.to_string(),
        rows: rows.iter().map(|row| row.to_string()).collect(),
    }
}
