//! Submit flow through EffectStoreTestHarness: store, component and render
//! together, with the search handler simulated by completing actions.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use route_finder::{
    action::Action,
    components::{Component, SearchFormProps, SearchFormView},
    effect::Effect,
    form::{FormField, TravelMode},
    reducer::reducer,
    region::RegionList,
    search::SearchRequest,
    state::AppState,
};
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, EventKind, NumericComponentId};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn fresh_state() -> AppState {
    AppState::new(RegionList::india(), today())
}

fn filled_state() -> AppState {
    let mut state = fresh_state();
    state.form.set_origin_city("Pune");
    state.form.set_origin_state("Maharashtra");
    state.form.set_destination_city("Goa");
    state.form.set_destination_state("Goa");
    state.form.set_travel_mode(TravelMode::TrainBus);
    state
}

fn pune_to_goa() -> SearchRequest {
    SearchRequest {
        origin: "Pune, Maharashtra".into(),
        destination: "Goa, Goa".into(),
        travel_mode: TravelMode::TrainBus,
        journey_date: Some(today()),
    }
}

fn press(component: &mut SearchFormView, state: &AppState, code: KeyCode) -> Vec<Action> {
    let event = EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE));
    component
        .handle_event(&event, SearchFormProps::from_state(state, true))
        .into_iter()
        .collect()
}

// ============================================================================
// Submit flow
// ============================================================================

#[test]
fn test_submit_flow_with_harness() {
    let mut harness = EffectStoreTestHarness::new(filled_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.assert_state(|s| s.status.is_searching());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::Search(r) if *r == pune_to_goa()));

    // Handler accepted the request
    harness.complete_action(Action::SearchDidComplete(pune_to_goa()));
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| !s.status.is_searching());
    harness.assert_state(|s| s.last_request == Some(pune_to_goa()));
}

#[test]
fn test_handler_failure_flow() {
    let mut harness = EffectStoreTestHarness::new(filled_state(), reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.complete_action(Action::SearchDidError("disk full".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.status.error() == Some("disk full"));

    // Submitting again is allowed after a failure
    harness.dispatch_collect(Action::FormSubmit);
    harness.assert_state(|s| s.status.is_searching());
    let effects = harness.drain_effects();
    effects.effects_count(2);
}

#[test]
fn test_submit_ignored_while_searching() {
    let mut harness = EffectStoreTestHarness::new(filled_state(), reducer);

    let results = harness.dispatch_all([Action::FormSubmit, Action::FormSubmit]);
    assert_eq!(results, vec![true, false]);

    let effects = harness.drain_effects();
    effects.effects_count(1);
}

#[test]
fn test_missing_field_emits_no_effect() {
    let mut state = filled_state();
    state.form.set_origin_city("");
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::FormSubmit);
    harness.assert_state(|s| s.validation == Some(FormField::OriginCity));
    harness.assert_state(|s| !s.status.is_searching());

    let effects = harness.drain_effects();
    effects.effects_empty();

    // Typing into the field clears the message
    harness.dispatch_collect(Action::FormOriginCityChange("Pune".into()));
    harness.assert_state(|s| s.validation.is_none());
}

// ============================================================================
// Component + Store Integration
// ============================================================================

#[test]
fn test_keyboard_typing_reaches_state() {
    let mut harness = EffectStoreTestHarness::new(fresh_state(), reducer);
    let mut component = SearchFormView::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("p", |state, event| {
        component
            .handle_event(&event.kind, SearchFormProps::from_state(state, true))
            .into_iter()
            .collect::<Vec<_>>()
    });
    actions.assert_count(1);

    for action in actions {
        harness.dispatch_collect(action);
    }
    harness.assert_state(|s| s.form.origin_city == "p");
}

#[test]
fn test_keyboard_walks_to_submit() {
    let mut store = EffectStore::new(filled_state(), reducer);
    let mut component = SearchFormView::new();

    // Tab through every field to the submit control
    for _ in 0..6 {
        for action in press(&mut component, store.state(), KeyCode::Tab) {
            store.dispatch(action);
        }
    }
    assert_eq!(store.state().focus, FormField::Submit);

    let actions = press(&mut component, store.state(), KeyCode::Enter);
    actions.assert_first(Action::FormSubmit);
    let mut effects = Vec::new();
    for action in actions {
        effects.extend(store.dispatch(action).effects);
    }
    assert_eq!(effects, vec![Effect::Search(pune_to_goa())]);

    // Disabled while the search runs
    let actions = press(&mut component, store.state(), KeyCode::Enter);
    actions.assert_empty();
}

#[test]
fn test_keyboard_picks_region() {
    let mut state = fresh_state();
    state.focus = FormField::OriginState;
    let mut store = EffectStore::new(state, reducer);
    let mut component = SearchFormView::new();

    for action in press(&mut component, store.state(), KeyCode::Enter) {
        store.dispatch(action);
    }
    assert!(store.state().picker_open());

    store.dispatch(Action::PickerQueryChange("goa".into()));
    store.dispatch(Action::PickerConfirm);
    assert_eq!(store.state().form.origin_state, "Goa");
    assert!(!store.state().picker_open());
}

// ============================================================================
// Render
// ============================================================================

#[test]
fn test_render_follows_status() {
    let mut harness = EffectStoreTestHarness::new(filled_state(), reducer);
    let mut component = SearchFormView::new();

    let idle = harness.render_plain(70, 26, |frame, area, state| {
        component.render(frame, area, SearchFormProps::from_state(state, true));
    });
    assert!(idle.contains("Find Route"), "Idle label missing:\n{}", idle);

    harness.dispatch_collect(Action::FormSubmit);
    let busy = harness.render_plain(70, 26, |frame, area, state| {
        component.render(frame, area, SearchFormProps::from_state(state, true));
    });
    assert!(busy.contains("Searching..."), "Busy label missing:\n{}", busy);
    assert!(!busy.contains("Find Route"));

    harness.complete_action(Action::SearchDidComplete(pune_to_goa()));
    harness.process_emitted();
    let done = harness.render_plain(70, 26, |frame, area, state| {
        component.render(frame, area, SearchFormProps::from_state(state, true));
    });
    assert!(done.contains("Find Route"));
    assert!(done.contains("Pune, Maharashtra"), "Last search missing:\n{}", done);
}
