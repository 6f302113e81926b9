//! Trip-search form fields and submission

use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::search::SearchRequest;

/// Shown next to a required field that was empty on submit.
pub const REQUIRED_FIELD_MESSAGE: &str = "Please fill out this field.";

/// Combination of transport types for the trip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum TravelMode {
    #[default]
    #[serde(rename = "BUS ONLY")]
    BusOnly,
    #[serde(rename = "TRAIN + BUS")]
    TrainBus,
    #[serde(rename = "FLIGHT + BUS/AUTO")]
    FlightBusAuto,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [
        TravelMode::BusOnly,
        TravelMode::TrainBus,
        TravelMode::FlightBusAuto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::BusOnly => "BUS ONLY",
            TravelMode::TrainBus => "TRAIN + BUS",
            TravelMode::FlightBusAuto => "FLIGHT + BUS/AUTO",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TravelMode::BusOnly => 0,
            TravelMode::TrainBus => 1,
            TravelMode::FlightBusAuto => 2,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two region dropdowns
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum RegionSlot {
    Origin,
    Destination,
}

impl RegionSlot {
    pub fn field(&self) -> FormField {
        match self {
            RegionSlot::Origin => FormField::OriginState,
            RegionSlot::Destination => FormField::DestinationState,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RegionSlot::Origin => "Origin State/UT",
            RegionSlot::Destination => "Destination State/UT",
        }
    }
}

/// Focusable controls, in display order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    #[default]
    OriginCity,
    OriginState,
    DestinationCity,
    DestinationState,
    JourneyDate,
    TravelMode,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::OriginCity,
        FormField::OriginState,
        FormField::DestinationCity,
        FormField::DestinationState,
        FormField::JourneyDate,
        FormField::TravelMode,
        FormField::Submit,
    ];

    fn position(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::OriginCity | FormField::DestinationCity => "City/Town",
            FormField::OriginState | FormField::DestinationState => "State/UT",
            FormField::JourneyDate => "Journey Date",
            FormField::TravelMode => "Mode of Travel",
            FormField::Submit => "Find Route",
        }
    }

    /// Label including the section, for messages that stand alone.
    pub fn describe(&self) -> &'static str {
        match self {
            FormField::OriginCity => "Origin City/Town",
            FormField::OriginState => "Origin State/UT",
            FormField::DestinationCity => "Destination City/Town",
            FormField::DestinationState => "Destination State/UT",
            other => other.label(),
        }
    }

    /// The four text fields a submit needs, in display order.
    pub fn required_fields() -> [FormField; 4] {
        [
            FormField::OriginCity,
            FormField::OriginState,
            FormField::DestinationCity,
            FormField::DestinationState,
        ]
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FormField::OriginCity
                | FormField::OriginState
                | FormField::DestinationCity
                | FormField::DestinationState
        )
    }

    pub fn region_slot(&self) -> Option<RegionSlot> {
        match self {
            FormField::OriginState => Some(RegionSlot::Origin),
            FormField::DestinationState => Some(RegionSlot::Destination),
            _ => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{}: {}", .0.describe(), REQUIRED_FIELD_MESSAGE)]
    MissingField(FormField),
}

/// The six form values. Setters accept anything; validation happens only
/// on submit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchForm {
    pub origin_city: String,
    pub origin_state: String,
    pub destination_city: String,
    pub destination_state: String,
    pub travel_mode: TravelMode,
    pub journey_date: Option<NaiveDate>,
}

impl SearchForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            origin_city: String::new(),
            origin_state: String::new(),
            destination_city: String::new(),
            destination_state: String::new(),
            travel_mode: TravelMode::default(),
            journey_date: Some(today),
        }
    }

    pub fn set_origin_city(&mut self, value: impl Into<String>) {
        self.origin_city = value.into();
    }

    pub fn set_origin_state(&mut self, value: impl Into<String>) {
        self.origin_state = value.into();
    }

    pub fn set_destination_city(&mut self, value: impl Into<String>) {
        self.destination_city = value.into();
    }

    pub fn set_destination_state(&mut self, value: impl Into<String>) {
        self.destination_state = value.into();
    }

    pub fn set_travel_mode(&mut self, mode: TravelMode) {
        self.travel_mode = mode;
    }

    pub fn set_journey_date(&mut self, date: Option<NaiveDate>) {
        self.journey_date = date;
    }

    pub fn set_region(&mut self, slot: RegionSlot, value: impl Into<String>) {
        match slot {
            RegionSlot::Origin => self.set_origin_state(value),
            RegionSlot::Destination => self.set_destination_state(value),
        }
    }

    pub fn region(&self, slot: RegionSlot) -> &str {
        match slot {
            RegionSlot::Origin => &self.origin_state,
            RegionSlot::Destination => &self.destination_state,
        }
    }

    /// Current text of a required field; `None` for the other controls.
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::OriginCity => Some(&self.origin_city),
            FormField::OriginState => Some(&self.origin_state),
            FormField::DestinationCity => Some(&self.destination_city),
            FormField::DestinationState => Some(&self.destination_state),
            _ => None,
        }
    }

    /// First required field (in display order) that is still empty.
    pub fn first_missing(&self) -> Option<FormField> {
        FormField::required_fields()
            .into_iter()
            .find(|field| self.text(*field).is_some_and(str::is_empty))
    }

    /// Build the request handed to the search handler.
    ///
    /// City and region are joined verbatim as `"City, Region"`.
    pub fn submit(&self) -> Result<SearchRequest, FormError> {
        if let Some(field) = self.first_missing() {
            return Err(FormError::MissingField(field));
        }
        Ok(SearchRequest {
            origin: format!("{}, {}", self.origin_city, self.origin_state),
            destination: format!("{}, {}", self.destination_city, self.destination_state),
            travel_mode: self.travel_mode,
            journey_date: self.journey_date,
        })
    }
}
