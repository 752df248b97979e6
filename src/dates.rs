//! Calendar date helpers shared by the lookups and the return formulas

use chrono::{Days, NaiveDate};

use crate::errors::InvalidDateFormatError;

/// The textual pattern every date is exchanged in
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, InvalidDateFormatError> {
    let invalid = || InvalidDateFormatError {
        input: input.to_string(),
    };
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())?;
    // `%Y` takes any number of digits, only the exact 4-2-2 shape is accepted
    if date.format(DATE_FORMAT).to_string() != trimmed {
        return Err(invalid());
    }
    Ok(date)
}

// exclusive end of the single-day window starting at `date`
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

/// Whole calendar days between two dates, regardless of their order
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}
