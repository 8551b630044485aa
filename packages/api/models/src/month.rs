//! `YYYY-MM` month keys as used by the backend.
//!
//! Months travel over the wire as plain strings so they sort
//! lexicographically in chronological order. These helpers validate and
//! do calendar arithmetic on them via `chrono`.

use chrono::{Datelike, Months, NaiveDate};
use thiserror::Error;

/// Last month backed by recorded data.
pub const HISTORICAL_CUTOFF: &str = "2025-12";

/// The "current" month of the forecast timeline.
pub const CURRENT_MONTH: &str = "2026-01";

/// First projected month after [`CURRENT_MONTH`].
pub const FUTURE_START: &str = "2026-02";

/// Last month covered by the 3-month forecast.
pub const FORECAST_HORIZON_END: &str = "2026-04";

/// Error returned when a string is not a valid `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{value}': expected YYYY-MM")]
pub struct MonthParseError {
    /// The rejected input.
    pub value: String,
}

/// Parses a `YYYY-MM` month into the first day of that month.
///
/// # Errors
///
/// Returns [`MonthParseError`] if the input is not exactly `YYYY-MM` or
/// names an impossible month.
pub fn parse_month(value: &str) -> Result<NaiveDate, MonthParseError> {
    let err = || MonthParseError {
        value: value.to_string(),
    };

    if value.len() != 7 || value.as_bytes()[4] != b'-' {
        return Err(err());
    }

    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").map_err(|_| err())
}

/// Formats a date as its `YYYY-MM` month key.
#[must_use]
pub fn format_month(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Returns the month `count` months after `month`.
///
/// # Errors
///
/// Returns [`MonthParseError`] if `month` is malformed or the result
/// falls outside the supported calendar range.
pub fn add_months(month: &str, count: u32) -> Result<String, MonthParseError> {
    parse_month(month)?
        .checked_add_months(Months::new(count))
        .map(format_month)
        .ok_or_else(|| MonthParseError {
            value: month.to_string(),
        })
}
