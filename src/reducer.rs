//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::form::{FormError, FormField, RegionSlot};
use crate::state::{AppState, RegionPickerState, SearchStatus};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Form setters =====
        Action::FormOriginCityChange(value) => {
            state.form.set_origin_city(value);
            clear_validation(state, FormField::OriginCity);
            DispatchResult::changed()
        }

        Action::FormOriginStateChange(value) => {
            state.form.set_origin_state(value);
            clear_validation(state, FormField::OriginState);
            DispatchResult::changed()
        }

        Action::FormDestinationCityChange(value) => {
            state.form.set_destination_city(value);
            clear_validation(state, FormField::DestinationCity);
            DispatchResult::changed()
        }

        Action::FormDestinationStateChange(value) => {
            state.form.set_destination_state(value);
            clear_validation(state, FormField::DestinationState);
            DispatchResult::changed()
        }

        Action::FormTravelModeChange(mode) => {
            if state.form.travel_mode == mode {
                return DispatchResult::unchanged();
            }
            state.form.set_travel_mode(mode);
            DispatchResult::changed()
        }

        Action::FormJourneyDateChange(date) => {
            if let Some(date) = date {
                if !state.date_window().contains(date) {
                    return DispatchResult::unchanged();
                }
            }
            if state.form.journey_date == date {
                return DispatchResult::unchanged();
            }
            state.form.set_journey_date(date);
            DispatchResult::changed()
        }

        Action::FormJourneyDateStep(step) => {
            let window = state.date_window();
            match step.apply(state.form.journey_date, window) {
                Some(date) if state.form.journey_date != Some(date) => {
                    state.form.set_journey_date(Some(date));
                    DispatchResult::changed()
                }
                _ => DispatchResult::unchanged(),
            }
        }

        Action::FormSubmit => {
            // The submit control is disabled while a search is in flight
            if state.status.is_searching() {
                return DispatchResult::unchanged();
            }
            match state.form.submit() {
                Ok(request) => {
                    state.validation = None;
                    state.status = SearchStatus::Searching;
                    DispatchResult::changed_with(Effect::Search(request))
                }
                Err(FormError::MissingField(field)) => {
                    state.validation = Some(field);
                    state.focus = field;
                    DispatchResult::changed()
                }
            }
        }

        // ===== Focus =====
        Action::FocusNext => {
            let next = state.focus.next();
            set_focus(state, next)
        }
        Action::FocusPrev => {
            let prev = state.focus.prev();
            set_focus(state, prev)
        }

        // ===== Region dropdown =====
        Action::PickerOpen(slot) => {
            let current = state.form.region(slot);
            let selected = state
                .regions
                .iter()
                .position(|r| r.name == current)
                .unwrap_or(0);
            state.picker = RegionPickerState {
                slot: Some(slot),
                query: String::new(),
                selected,
            };
            state.focus = slot.field();
            DispatchResult::changed()
        }

        Action::PickerClose => {
            if !state.picker.is_open() {
                return DispatchResult::unchanged();
            }
            state.picker = RegionPickerState::default();
            DispatchResult::changed()
        }

        Action::PickerQueryChange(query) => {
            if !state.picker.is_open() {
                return DispatchResult::unchanged();
            }
            state.picker.query = query;
            state.picker.selected = 0;
            DispatchResult::changed()
        }

        Action::PickerSelect(index) => {
            let count = state.picker_matches().len();
            if index < count && index != state.picker.selected {
                state.picker.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::PickerConfirm => {
            let Some(slot) = state.picker.slot else {
                return DispatchResult::unchanged();
            };
            let Some(name) = state
                .picker_matches()
                .get(state.picker.selected)
                .map(|r| r.name.clone())
            else {
                return DispatchResult::unchanged();
            };
            set_region(state, slot, name);
            state.picker = RegionPickerState::default();
            DispatchResult::changed()
        }

        // ===== Search results =====
        Action::SearchDidComplete(request) => {
            state.status = SearchStatus::Idle;
            state.last_request = Some(request);
            DispatchResult::changed()
        }

        Action::SearchDidError(msg) => {
            state.status = SearchStatus::Failed(msg);
            DispatchResult::changed()
        }

        // ===== Clock =====
        Action::ClockTick(today) => {
            if state.today == today {
                return DispatchResult::unchanged();
            }
            state.today = today;
            if let Some(date) = state.form.journey_date {
                if !state.date_window().contains(date) {
                    state.form.set_journey_date(None);
                }
            }
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn set_focus(state: &mut AppState, field: FormField) -> DispatchResult<Effect> {
    if state.focus == field {
        return DispatchResult::unchanged();
    }
    state.focus = field;
    DispatchResult::changed()
}

fn set_region(state: &mut AppState, slot: RegionSlot, name: String) {
    state.form.set_region(slot, name);
    clear_validation(state, slot.field());
}

/// Editing a field dismisses its "required" message.
fn clear_validation(state: &mut AppState, field: FormField) {
    if state.validation == Some(field) {
        state.validation = None;
    }
}
