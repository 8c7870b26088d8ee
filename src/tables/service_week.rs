use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use gtfs_structures::{Calendar, CalendarDate, Exception, Gtfs};

use crate::tables::date::date_ops::{self, WEEK_DAYS};
use crate::tables::tables_error::TableError;

/// which services run on each day of one compilation window. slot `i` holds
/// the services active on the window's `i`th date; the window is the 7
/// consecutive dates ending at the anchor, inclusive. resolved per report
/// request and frozen for its duration.
pub struct ServiceWeek {
    dates: [NaiveDate; WEEK_DAYS],
    days: [HashSet<String>; WEEK_DAYS],
}

impl ServiceWeek {
    /// resolves the window ending at `week_ending` against the feed's service
    /// calendars and dated exceptions.
    pub fn resolve(gtfs: &Gtfs, week_ending: NaiveDate) -> Result<ServiceWeek, TableError> {
        resolve_window(&gtfs.calendar, &gtfs.calendar_dates, week_ending)
    }

    pub fn dates(&self) -> &[NaiveDate; WEEK_DAYS] {
        &self.dates
    }

    pub fn date(&self, day: usize) -> NaiveDate {
        self.dates[day]
    }

    pub fn active(&self, day: usize, service_id: &str) -> bool {
        self.days[day].contains(service_id)
    }

    pub fn active_services(&self, day: usize) -> &HashSet<String> {
        &self.days[day]
    }
}

/// seeds each window slot from the static weekly recurrence, then overlays
/// the dated exceptions that fall inside the window: all Adds for a day are
/// applied before any Delete for that day, so a same-day Add/Delete pair
/// always nets to inactive regardless of exception-list order.
pub fn resolve_window(
    calendar: &HashMap<String, Calendar>,
    calendar_dates: &HashMap<String, Vec<CalendarDate>>,
    week_ending: NaiveDate,
) -> Result<ServiceWeek, TableError> {
    let dates = date_ops::week_window(week_ending)?;
    let mut days: [HashSet<String>; WEEK_DAYS] = std::array::from_fn(|_| HashSet::new());

    for (service_id, service) in calendar.iter() {
        if empty_daymap(service) {
            // contributes to no day unless an Add lands in the window
            log::debug!("service {service_id} has an all-false weekly recurrence");
        }
        for (day, date) in dates.iter().enumerate() {
            if service.valid_weekday(*date) {
                days[day].insert(service_id.clone());
            }
        }
    }

    let mut adds: Vec<(usize, &CalendarDate)> = Vec::new();
    let mut deletes: Vec<(usize, &CalendarDate)> = Vec::new();
    for (service_id, exceptions) in calendar_dates.iter() {
        for exception in exceptions.iter() {
            match window_offset(&dates, exception.date) {
                None => log::debug!(
                    "exception for service {service_id} on {} falls outside the window ending {week_ending}",
                    exception.date
                ),
                Some(day) => match exception.exception_type {
                    Exception::Added => adds.push((day, exception)),
                    Exception::Deleted => deletes.push((day, exception)),
                },
            }
        }
    }
    for (day, exception) in adds {
        days[day].insert(exception.service_id.clone());
    }
    for (day, exception) in deletes {
        days[day].remove(&exception.service_id);
    }

    Ok(ServiceWeek { dates, days })
}

/// offset of `date` inside the window, or `None` when it falls outside.
fn window_offset(dates: &[NaiveDate; WEEK_DAYS], date: NaiveDate) -> Option<usize> {
    dates.iter().position(|d| *d == date)
}

fn empty_daymap(service: &Calendar) -> bool {
    !(service.monday
        || service.tuesday
        || service.wednesday
        || service.thursday
        || service.friday
        || service.saturday
        || service.sunday)
}
