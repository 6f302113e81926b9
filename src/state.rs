//! Application state - single source of truth

use chrono::{Local, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::DateWindow;
use crate::form::{FormField, RegionSlot, SearchForm};
use crate::region::{Region, RegionList};
use crate::search::SearchRequest;

/// How often the clock subscription re-reads today's date.
pub const CLOCK_TICK_SECS: u64 = 30;

/// Lifecycle of a submitted search: Idle → Searching → Idle/Failed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Failed(String),
}

impl SearchStatus {
    pub fn is_searching(&self) -> bool {
        matches!(self, SearchStatus::Searching)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SearchStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_searching() {
            "Searching..."
        } else {
            "Find Route"
        }
    }
}

/// Region dropdown overlay
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegionPickerState {
    /// Which field the dropdown is open for; `None` when closed
    pub slot: Option<RegionSlot>,
    pub query: String,
    /// Index into the filtered list
    pub selected: usize,
}

impl RegionPickerState {
    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Form (visible in debug) ---
    #[debug(section = "Form", label = "Values", debug_fmt)]
    pub form: SearchForm,

    #[debug(section = "Form", label = "Focus", debug_fmt)]
    pub focus: FormField,

    /// Required field that blocked the last submit
    #[debug(section = "Form", label = "Invalid", debug_fmt)]
    pub validation: Option<FormField>,

    #[debug(section = "Search", label = "Status", debug_fmt)]
    pub status: SearchStatus,

    #[debug(section = "Search", label = "Last request", debug_fmt)]
    pub last_request: Option<SearchRequest>,

    /// Date the journey window starts from
    #[debug(section = "Clock", label = "Today", debug_fmt)]
    pub today: NaiveDate,

    // --- Reference data (skipped) ---
    /// Injected at startup, read-only
    #[debug(skip)]
    pub regions: RegionList,

    // --- Dropdown (skipped) ---
    #[debug(skip)]
    pub picker: RegionPickerState,
}

impl AppState {
    pub fn new(regions: RegionList, today: NaiveDate) -> Self {
        Self {
            form: SearchForm::new(today),
            focus: FormField::default(),
            validation: None,
            status: SearchStatus::Idle,
            last_request: None,
            today,
            regions,
            picker: RegionPickerState::default(),
        }
    }

    /// Selectable journey dates, derived from `today` every time.
    pub fn date_window(&self) -> DateWindow {
        DateWindow::starting(self.today)
    }

    /// Regions matching the dropdown filter
    pub fn picker_matches(&self) -> Vec<&Region> {
        self.regions.matching(&self.picker.query)
    }

    pub fn picker_open(&self) -> bool {
        self.picker.is_open()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(RegionList::default(), Local::now().date_naive())
    }
}
