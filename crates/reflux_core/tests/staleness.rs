mod common;

use pretty_assertions::assert_eq;
use reflux_core::{RunLoop, ViewModel};

use common::{init_logging, loading, ready, Input, Phase, SearchMachine, FETCH_DELAY};

fn search_vm() -> (ViewModel<SearchMachine>, RunLoop) {
    let run_loop = RunLoop::new();
    let (machine, _journal) = SearchMachine::new(&run_loop);
    (ViewModel::new(machine), run_loop)
}

#[test]
fn deferred_fetch_completes_on_a_later_turn() {
    init_logging();
    let (vm, run_loop) = search_vm();

    vm.receive(Input::Search("rust".into()));
    assert_eq!(vm.state(), loading("rust"));

    assert_eq!(run_loop.advance(FETCH_DELAY), 1);
    assert_eq!(vm.state(), ready("rust", &["rust-1"]));
}

#[test]
fn reset_while_loading_discards_the_result() {
    init_logging();
    let (vm, run_loop) = search_vm();

    vm.receive(Input::Search("rust".into()));
    vm.receive(Input::Reset);
    run_loop.run_until_idle();

    assert_eq!(vm.state(), Phase::Idle);
}

#[test]
fn superseded_search_cannot_overwrite_the_newer_one() {
    init_logging();
    let (vm, run_loop) = search_vm();

    vm.receive(Input::Search("old".into()));
    run_loop.advance(FETCH_DELAY / 2);
    vm.receive(Input::Search("new".into()));

    // "old" completes first, while the view model is loading "new".
    assert_eq!(run_loop.advance(FETCH_DELAY / 2), 1);
    assert_eq!(vm.state(), loading("new"));

    run_loop.run_until_idle();
    assert_eq!(vm.state(), ready("new", &["new-1"]));
}

#[test]
fn result_after_view_model_is_gone_is_dropped() {
    init_logging();
    let (vm, run_loop) = search_vm();
    vm.receive(Input::Search("rust".into()));
    drop(vm);

    assert_eq!(run_loop.run_until_idle(), 1);
}

#[test]
fn result_from_an_earlier_visit_to_an_equal_state_is_discarded() {
    init_logging();
    let (vm, run_loop) = search_vm();

    vm.receive(Input::Search("a".into()));
    run_loop.advance(FETCH_DELAY / 2);
    vm.receive(Input::Reset);
    vm.receive(Input::Search("a".into()));
    assert_eq!(vm.state(), loading("a"));

    // The first fetch lands while the second, identical search is pending.
    assert_eq!(run_loop.advance(FETCH_DELAY / 2), 1);
    assert_eq!(vm.state(), loading("a"));
    assert_eq!(vm.revision(), 3);

    assert_eq!(run_loop.advance(FETCH_DELAY / 2), 1);
    assert_eq!(vm.state(), ready("a", &["a-1"]));
}
