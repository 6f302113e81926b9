//! Action and state tests using TestHarness and EffectStore

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use route_finder::{
    action::Action,
    calendar::DateStep,
    components::{Component, SearchFormProps, SearchFormView},
    effect::Effect,
    form::{FormField, RegionSlot, TravelMode},
    reducer::reducer,
    region::RegionList,
    search::SearchRequest,
    state::{AppState, SearchStatus},
};
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, NumericComponentId, assert_emitted, assert_not_emitted};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fresh_state() -> AppState {
    AppState::new(RegionList::india(), date(2024, 5, 1))
}

fn fill_pune_to_goa(store: &mut EffectStore<AppState, Action, Effect>) {
    store.dispatch(Action::FormOriginCityChange("Pune".into()));
    store.dispatch(Action::FormOriginStateChange("Maharashtra".into()));
    store.dispatch(Action::FormDestinationCityChange("Goa".into()));
    store.dispatch(Action::FormDestinationStateChange("Goa".into()));
    store.dispatch(Action::FormTravelModeChange(TravelMode::TrainBus));
}

#[test]
fn test_defaults() {
    let store = EffectStore::new(fresh_state(), reducer);

    assert_eq!(store.state().form.travel_mode, TravelMode::BusOnly);
    assert_eq!(store.state().form.journey_date, Some(date(2024, 5, 1)));
    assert_eq!(store.state().focus, FormField::OriginCity);
    assert_eq!(store.state().status, SearchStatus::Idle);
}

#[test]
fn test_submit_emits_search() {
    let mut store = EffectStore::new(fresh_state(), reducer);
    fill_pune_to_goa(&mut store);

    let result = store.dispatch(Action::FormSubmit);
    assert!(result.changed);
    assert_eq!(
        result.effects,
        vec![Effect::Search(SearchRequest {
            origin: "Pune, Maharashtra".into(),
            destination: "Goa, Goa".into(),
            travel_mode: TravelMode::TrainBus,
            journey_date: Some(date(2024, 5, 1)),
        })]
    );
    assert!(store.state().status.is_searching());
}

#[test]
fn test_submit_with_missing_field_emits_nothing() {
    let mut store = EffectStore::new(fresh_state(), reducer);
    store.dispatch(Action::FormOriginCityChange("Pune".into()));
    store.dispatch(Action::FormOriginStateChange("Maharashtra".into()));
    store.dispatch(Action::FormDestinationCityChange("Goa".into()));

    let result = store.dispatch(Action::FormSubmit);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().validation, Some(FormField::DestinationState));
    assert_eq!(store.state().focus, FormField::DestinationState);
    assert_eq!(store.state().status, SearchStatus::Idle);
}

#[test]
fn test_date_window_bounds() {
    let mut store = EffectStore::new(fresh_state(), reducer);

    // Both ends are selectable
    store.dispatch(Action::FormJourneyDateChange(Some(date(2024, 7, 1))));
    assert_eq!(store.state().form.journey_date, Some(date(2024, 7, 1)));
    store.dispatch(Action::FormJourneyDateChange(Some(date(2024, 5, 1))));
    assert_eq!(store.state().form.journey_date, Some(date(2024, 5, 1)));

    // Outside the window is ignored
    let before = store.dispatch(Action::FormJourneyDateChange(Some(date(2024, 4, 30))));
    let after = store.dispatch(Action::FormJourneyDateChange(Some(date(2024, 7, 2))));
    assert!(!before.changed);
    assert!(!after.changed);
    assert_eq!(store.state().form.journey_date, Some(date(2024, 5, 1)));
}

#[test]
fn test_date_step_stops_at_window_end() {
    let mut store = EffectStore::new(fresh_state(), reducer);

    store.dispatch(Action::FormJourneyDateStep(DateStep::End));
    assert_eq!(store.state().form.journey_date, Some(date(2024, 7, 1)));

    let result = store.dispatch(Action::FormJourneyDateStep(DateStep::NextDay));
    assert!(!result.changed);
    assert_eq!(store.state().form.journey_date, Some(date(2024, 7, 1)));
}

#[test]
fn test_picker_confirm_fills_region() {
    let mut store = EffectStore::new(fresh_state(), reducer);

    store.dispatch(Action::PickerOpen(RegionSlot::Origin));
    assert!(store.state().picker_open());
    store.dispatch(Action::PickerQueryChange("maha".into()));
    store.dispatch(Action::PickerConfirm);

    assert!(!store.state().picker_open());
    assert_eq!(store.state().form.origin_state, "Maharashtra");
}

#[test]
fn test_component_keyboard_events() {
    let mut harness = TestHarness::<AppState, Action>::new(fresh_state());
    let mut component = SearchFormView::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("p", |state, event| {
        let props = SearchFormProps::from_state(state, true);
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::FormOriginCityChange("p".into()));
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::new(fresh_state());
    let mut component = SearchFormView::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("p u n", |state, event| {
        let props = SearchFormProps::from_state(state, false);
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let change = Action::FormOriginCityChange("Pune".into());
    let submit = Action::FormSubmit;
    let query = Action::PickerQueryChange("go".into());
    let done = Action::SearchDidError("disk full".into());

    // Categories are the name minus its trailing verb
    assert_eq!(change.category(), Some("form_origin_city"));
    assert_eq!(submit.category(), Some("form"));
    assert_eq!(query.category(), Some("picker_query"));
    assert_eq!(done.category(), Some("search_did"));

    // Names without a recognised verb stay uncategorized
    assert_eq!(Action::FocusNext.category(), None);
    assert_eq!(Action::ClockTick(date(2024, 5, 2)).category(), None);
    assert_eq!(Action::Render.category(), None);

    // Generated predicates for categorized actions
    assert!(submit.is_form());
    assert!(!change.is_form());
    assert!(done.is_search_did());
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::PickerOpen(RegionSlot::Destination),
        Action::PickerQueryChange("go".into()),
        Action::PickerConfirm,
    ];

    assert_emitted!(actions, Action::PickerOpen(RegionSlot::Destination));
    assert_emitted!(actions, Action::PickerQueryChange(_));
    assert_not_emitted!(actions, Action::FormSubmit);
    assert_not_emitted!(actions, Action::Quit);
}

#[test]
fn test_mode_labels() {
    let labels: Vec<_> = TravelMode::ALL.iter().map(|m| m.as_str()).collect();
    assert_eq!(labels, vec!["BUS ONLY", "TRAIN + BUS", "FLIGHT + BUS/AUTO"]);
}
