//! Actions - every state change goes through one of these

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::DateStep;
use crate::form::{RegionSlot, TravelMode};
use crate::search::SearchRequest;

/// Application actions with automatic category inference.
///
/// Categories come from the variant name minus its trailing verb, so each
/// form setter lands in its own category (`form_origin_city`,
/// `form_travel_mode`, ...) while `FormSubmit` is plain `form`.
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Form setters (one category per field) =====
    FormOriginCityChange(String),
    FormOriginStateChange(String),
    FormDestinationCityChange(String),
    FormDestinationStateChange(String),
    FormTravelModeChange(TravelMode),

    /// Set or clear the journey date; dates outside the window are ignored
    FormJourneyDateChange(Option<NaiveDate>),

    /// Move the date picker cursor
    FormJourneyDateStep(DateStep),

    /// Validate and hand the request to the search handler
    FormSubmit,

    // ===== Focus (uncategorized) =====
    FocusNext,
    FocusPrev,

    // ===== Region dropdown (picker, picker_query) =====
    /// Open the region dropdown for one of the two region fields
    PickerOpen(RegionSlot),

    /// Close the dropdown without changing the field
    PickerClose,

    /// Filter text changed
    PickerQueryChange(String),

    /// Highlight a row of the filtered list (by index)
    PickerSelect(usize),

    /// Write the highlighted region into the field
    PickerConfirm,

    // ===== Search results (search_did) =====
    /// Result: the handler accepted the request
    SearchDidComplete(SearchRequest),

    /// Result: the handler failed
    SearchDidError(String),

    // ===== Clock (uncategorized) =====
    /// Current date, from the clock subscription
    ClockTick(NaiveDate),

    // ===== Uncategorized (global) =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    /// Exit the application
    Quit,
}
