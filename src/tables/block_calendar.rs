use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;

use crate::tables::block_schedule::{self, BlockDay, BlockSchedule};
use crate::tables::context::FeedCompilationContext;
use crate::tables::date::date_ops::{self, WEEK_DAYS};
use crate::tables::grouping::Blocktable;
use crate::tables::service_week::ServiceWeek;
use crate::tables::tables_error::TableError;

/// a month of block activity: one day slot per calendar day, each holding the
/// blocks (from every blocktable) active that date, ordered by start clock.
pub struct BlockCalendar {
    pub year: i32,
    pub month: u32,
    pub days: Vec<BlockDay>,
}

/// one <=7-day slice of a month, compiled as a single week window anchored at
/// the slice's final window date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSegment {
    /// first in-month date covered by the segment
    pub start: NaiveDate,
    /// number of in-month days covered (1..=7); the window may extend past
    /// the month end, those days are compiled but not copied
    pub len: u32,
    /// anchor handed to the week schedule builder: start + 6
    pub week_ending: NaiveDate,
}

/// iterator over the week segments covering one month. every day of the month
/// lands in exactly one segment.
pub struct MonthSegments {
    current: Option<NaiveDate>,
    last: NaiveDate,
}

impl MonthSegments {
    pub fn new(year: i32, month: u32) -> Result<MonthSegments, TableError> {
        let first = date_ops::first_of_month(year, month)?;
        let last = date_ops::step_date(first, date_ops::days_in_month(year, month)? as i64 - 1)?;
        Ok(MonthSegments {
            current: Some(first),
            last,
        })
    }
}

impl Iterator for MonthSegments {
    type Item = WeekSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.current?;
        if start > self.last {
            return None;
        }
        let week_ending = date_ops::step_date(start, WEEK_DAYS as i64 - 1).ok()?;
        let remaining = self.last.signed_duration_since(start).num_days() as u32 + 1;
        self.current = date_ops::step_date(start, WEEK_DAYS as i64).ok();
        Some(WeekSegment {
            start,
            len: remaining.min(WEEK_DAYS as u32),
            week_ending,
        })
    }
}

/// tiles the week schedules of every blocktable across the month: for each
/// week segment, resolve its service week once, compile each blocktable
/// against it, and copy the in-month days into the matching month-day slots.
/// a day legitimately hosts many distinct blocks; each block's bounds come
/// from that day's own compilation, never from a neighboring day.
pub fn create_block_calendar(
    context: &FeedCompilationContext,
    year: i32,
    month: u32,
) -> Result<BlockCalendar, TableError> {
    let n_days = date_ops::days_in_month(year, month)?;
    let first = date_ops::first_of_month(year, month)?;
    let mut days: Vec<BlockDay> = (0..n_days)
        .map(|offset| {
            Ok(BlockDay {
                date: date_ops::step_date(first, offset as i64)?,
                blocks: Vec::new(),
            })
        })
        .collect::<Result<_, TableError>>()?;

    let blocktables: Vec<&Blocktable> = context.blocktables_sorted().collect();
    for segment in MonthSegments::new(year, month)? {
        let week = ServiceWeek::resolve(context.gtfs(), segment.week_ending)?;
        // independent reads of the frozen context: compile the segment for
        // every blocktable concurrently, then merge in blocktable order
        let schedules: Vec<BlockSchedule> = blocktables
            .par_iter()
            .map(|blocktable| block_schedule::week_schedule(context, blocktable, &week))
            .collect();
        let base = segment.start.day() as usize - 1;
        for schedule in schedules.iter() {
            for offset in 0..segment.len as usize {
                for block in schedule.days[offset].blocks.iter() {
                    days[base + offset].blocks.push(block.clone());
                }
            }
        }
    }

    for day in days.iter_mut() {
        // blocks arrive in blocktable order; the stable sort keeps that order
        // for equal start clocks
        day.blocks.sort_by_key(|block| block.start_at);
        for pair in day.blocks.windows(2) {
            if pair[0].block_id == pair[1].block_id {
                log::warn!(
                    "block {} appears more than once on {}",
                    pair[0].block_label(),
                    day.date
                );
            }
        }
    }

    Ok(BlockCalendar { year, month, days })
}
