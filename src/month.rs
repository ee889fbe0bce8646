//! Month selection and the date window it maps to.
//!
//! Every monthly report is scoped to a half-open window `[start, end)` of
//! sale timestamps. The window always lies in a single reference year, no
//! matter which years appear in the data.

use serde::Deserialize;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

use crate::{Error, timezone::get_local_offset_at};

/// The year every month window falls in unless configured otherwise.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2022;

/// Where a month window stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowEnd {
    /// Stop at midnight on the last day of the month, so that day is left
    /// out of every report.
    #[default]
    LastDayOfMonth,
    /// Stop at midnight on the first day of the next month, covering the
    /// whole month.
    NextMonthStart,
}

/// How a month selector is turned into a window.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// The year all windows fall in.
    pub reference_year: i32,
    /// Where windows stop.
    pub window_end: WindowEnd,
    /// The timezone that window boundaries are midnight in, as a canonical
    /// timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            window_end: WindowEnd::default(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }
}

/// The query parameters of the monthly report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month number, 1 to 12.
    pub month: Option<String>,
}

/// A validated calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleMonth(Month);

impl SaleMonth {
    /// Parse a month number from a request.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `raw` is missing, not an integer, or
    /// outside of 1 to 12.
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        let raw = raw.unwrap_or_default();

        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok())
            .map(Self)
            .ok_or_else(|| Error::InvalidMonth(raw.to_owned()))
    }

    /// The month as a [time::Month].
    pub fn month(self) -> Month {
        self.0
    }
}

/// A half-open range of sale times `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleWindow {
    /// The first instant in the window.
    pub start: OffsetDateTime,
    /// The first instant after the window.
    pub end: OffsetDateTime,
}

impl WindowConfig {
    /// Compute the window for `month` in the reference year.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the configured timezone is unknown,
    /// or [Error::InvalidReferenceYear] if the reference year is outside the
    /// supported calendar range.
    pub fn window_for(&self, month: SaleMonth) -> Result<SaleWindow, Error> {
        let invalid_year = || {
            tracing::error!("Invalid reference year {}", self.reference_year);
            Error::InvalidReferenceYear(self.reference_year)
        };
        let start_date = Date::from_calendar_date(self.reference_year, month.month(), 1)
            .map_err(|_| invalid_year())?;
        let next_month_start = first_day_of_next_month(start_date).ok_or_else(invalid_year)?;

        let end_date = match self.window_end {
            WindowEnd::LastDayOfMonth => next_month_start.previous_day().unwrap_or(start_date),
            WindowEnd::NextMonthStart => next_month_start,
        };

        Ok(SaleWindow {
            start: self.local_midnight(start_date)?,
            end: self.local_midnight(end_date)?,
        })
    }

    fn local_midnight(&self, date: Date) -> Result<OffsetDateTime, Error> {
        let local = PrimitiveDateTime::new(date, Time::MIDNIGHT);
        let offset = get_local_offset_at(&self.local_timezone, local).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezone(self.local_timezone.clone())
        })?;

        Ok(local.assume_offset(offset))
    }
}

/// Whether every month window of `year` can be represented, including the
/// December window that ends in the following year.
pub fn is_valid_reference_year(year: i32) -> bool {
    Date::from_calendar_date(year, Month::December, 1)
        .ok()
        .and_then(first_day_of_next_month)
        .is_some()
        && Date::from_calendar_date(year, Month::January, 1).is_ok()
}

fn first_day_of_next_month(date: Date) -> Option<Date> {
    let (year, month) = match date.month() {
        Month::December => (date.year().checked_add(1)?, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).ok()
}
