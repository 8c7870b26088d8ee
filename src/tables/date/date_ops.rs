use chrono::{Datelike, Duration, NaiveDate};

use crate::tables::tables_error::TableError;

/// number of day slots in a compilation window.
pub const WEEK_DAYS: usize = 7;

/// helper function to step a date by a signed number of days, guarding
/// against chrono range overflow.
pub fn step_date(date: NaiveDate, days: i64) -> Result<NaiveDate, TableError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(TableError::DateOverflowError(date, days))
}

/// the compilation window anchored at `week_ending`: exactly 7 consecutive
/// dates ending at the anchor, inclusive of the boundary date.
pub fn week_window(week_ending: NaiveDate) -> Result<[NaiveDate; WEEK_DAYS], TableError> {
    let start = step_date(week_ending, -(WEEK_DAYS as i64 - 1))?;
    let mut window = [start; WEEK_DAYS];
    for (offset, slot) in window.iter_mut().enumerate() {
        *slot = step_date(start, offset as i64)?;
    }
    Ok(window)
}

/// first date of the given month, or an error for out-of-range arguments.
pub fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, TableError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TableError::InvalidMonthError(format!("{year}-{month:02}")))
}

/// number of days in the given month, leap-year February included.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, TableError> {
    let first = first_of_month(year, month)?;
    let next = if month == 12 {
        first_of_month(year + 1, 1)?
    } else {
        first_of_month(year, month + 1)?
    };
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// the Sunday on or after `today`, the default weekly report anchor.
pub fn upcoming_sunday(today: NaiveDate) -> Result<NaiveDate, TableError> {
    let offset = (WEEK_DAYS as u32 - today.weekday().num_days_from_sunday()) % WEEK_DAYS as u32;
    step_date(today, offset as i64)
}
