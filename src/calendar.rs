//! Journey date window and picker stepping

use chrono::{Days, Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How far ahead a journey can be booked.
pub const BOOKING_WINDOW_MONTHS: u32 = 2;

/// Display format for dates in the form.
pub const DATE_FORMAT: &str = "%a %d %b %Y";

/// Inclusive range of selectable journey dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateWindow {
    /// `[today, today + 2 months]`. Month addition clamps to the last day of
    /// the target month.
    pub fn starting(today: NaiveDate) -> Self {
        let max = today
            .checked_add_months(Months::new(BOOKING_WINDOW_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        Self { min: today, max }
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }
}

/// A single movement of the date picker cursor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DateStep {
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
    PrevMonth,
    NextMonth,
    /// Jump to the first selectable date (today)
    Start,
    /// Jump to the last selectable date
    End,
}

impl DateStep {
    /// Apply the step to `current`.
    ///
    /// Returns `None` when the result would leave the window. An unset date
    /// steps from the start of the window.
    pub fn apply(self, current: Option<NaiveDate>, window: DateWindow) -> Option<NaiveDate> {
        let Some(current) = current else {
            return match self {
                DateStep::End => Some(window.max()),
                _ => Some(window.min()),
            };
        };

        let candidate = match self {
            DateStep::PrevDay => current.checked_sub_days(Days::new(1)),
            DateStep::NextDay => current.checked_add_days(Days::new(1)),
            DateStep::PrevWeek => current.checked_sub_days(Days::new(7)),
            DateStep::NextWeek => current.checked_add_days(Days::new(7)),
            DateStep::PrevMonth => current.checked_sub_months(Months::new(1)),
            DateStep::NextMonth => current.checked_add_months(Months::new(1)),
            DateStep::Start => Some(window.min()),
            DateStep::End => Some(window.max()),
        }?;

        window.contains(candidate).then_some(candidate)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
