use std::sync::Arc;

use chrono::NaiveDate;
use gtfs_structures::Trip;

use crate::tables::context::FeedCompilationContext;
use crate::tables::date::date_ops::WEEK_DAYS;
use crate::tables::grouping::Blocktable;
use crate::tables::service_week::ServiceWeek;
use crate::tables::trip_ops;

/// one vehicle block's activity on a single calendar day: its trips in
/// departure order and the exact clock bounds over that day's trip set.
#[derive(Debug, Clone)]
pub struct Block {
    pub block_id: Option<String>,
    /// minimum first-departure over the day's trips
    pub start_at: u32,
    /// maximum last-arrival over the day's trips
    pub end_at: u32,
    pub trips: Vec<Arc<Trip>>,
}

impl Block {
    pub fn block_label(&self) -> &str {
        self.block_id.as_deref().unwrap_or_default()
    }
}

/// a date and the blocks active on it.
#[derive(Debug, Clone)]
pub struct BlockDay {
    pub date: NaiveDate,
    pub blocks: Vec<Block>,
}

/// one block's weekly schedule: always 7 day slots, however many are empty.
#[derive(Debug, Clone)]
pub struct BlockSchedule {
    pub block_id: Option<String>,
    pub days: [BlockDay; WEEK_DAYS],
}

/// compiles the weekly schedule for `block_id`. an unknown block id yields a
/// schedule of 7 empty days, consistent with treating absence as "nothing
/// scheduled".
pub fn create_block_schedule(
    context: &FeedCompilationContext,
    block_id: Option<&str>,
    week: &ServiceWeek,
) -> BlockSchedule {
    match context.blocktable(block_id) {
        Some(blocktable) => week_schedule(context, blocktable, week),
        None => BlockSchedule {
            block_id: block_id.map(String::from),
            days: empty_days(week),
        },
    }
}

/// projects one blocktable onto the window: for each day, the trips of every
/// servicetable whose service is active that day and valid on the day's date
/// are collected into the day's single block (created lazily on first match),
/// then the block is departure-sorted and its bounds computed from that day's
/// own trip set.
pub fn week_schedule(
    context: &FeedCompilationContext,
    blocktable: &Blocktable,
    week: &ServiceWeek,
) -> BlockSchedule {
    let mut days = empty_days(week);

    for (day, block_day) in days.iter_mut().enumerate() {
        let date = week.date(day);
        let mut collected: Option<Block> = None;
        for servicetable in blocktable.servicetables_sorted() {
            if !week.active(day, &servicetable.service_id)
                || !context.service_valid_on(&servicetable.service_id, date)
            {
                continue;
            }
            let block = collected.get_or_insert_with(|| Block {
                block_id: blocktable.block_id.clone(),
                start_at: 0,
                end_at: 0,
                trips: Vec::new(),
            });
            block.trips.extend(servicetable.trips.iter().cloned());
        }
        if let Some(mut block) = collected {
            finalize_block(&mut block);
            block_day.blocks.push(block);
        }
    }

    BlockSchedule {
        block_id: blocktable.block_id.clone(),
        days,
    }
}

fn empty_days(week: &ServiceWeek) -> [BlockDay; WEEK_DAYS] {
    (*week.dates()).map(|date| BlockDay {
        date,
        blocks: Vec::new(),
    })
}

/// departure-sorts the block's trips and recomputes its exact clock bounds.
/// trips without any clock values sort last and do not contribute bounds.
fn finalize_block(block: &mut Block) {
    block
        .trips
        .sort_by_key(|trip| trip_ops::first_departure(trip).unwrap_or(u32::MAX));
    block.start_at = block
        .trips
        .iter()
        .filter_map(|trip| trip_ops::first_departure(trip))
        .min()
        .unwrap_or_default();
    block.end_at = block
        .trips
        .iter()
        .filter_map(|trip| trip_ops::last_arrival(trip))
        .max()
        .unwrap_or_default();
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::create_block_schedule;
    use crate::tables::context::test::fixture_context;
    use crate::tables::service_week::ServiceWeek;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    const H: u32 = 3600;

    #[test]
    fn test_block_trips_ordered_by_departure_with_exact_bounds() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_block_schedule(&context, Some("B1"), &week);

        // Monday: services A and WKD both run
        let monday = &schedule.days[0];
        assert_eq!(monday.date, ymd(2024, 3, 4));
        assert_eq!(monday.blocks.len(), 1);
        let block = &monday.blocks[0];
        let order: Vec<&str> = block.trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["T02", "T01", "T08"]);
        // StartAt 07:30, EndAt 09:25 (the max last-arrival, from T08)
        assert_eq!(block.start_at, 7 * H + 30 * 60);
        assert_eq!(block.end_at, 9 * H + 25 * 60);
    }

    #[test]
    fn test_bounds_recomputed_per_day_under_exception() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_block_schedule(&context, Some("B1"), &week);

        // Wednesday 2024-03-06: service A deleted, T08 gone, EndAt shrinks
        let wednesday = &schedule.days[2];
        assert_eq!(wednesday.date, ymd(2024, 3, 6));
        let block = &wednesday.blocks[0];
        let order: Vec<&str> = block.trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["T02", "T01"]);
        assert_eq!(block.end_at, 8 * H + 30 * 60);
    }

    #[test]
    fn test_schedule_always_has_seven_day_slots() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_block_schedule(&context, Some("B1"), &week);
        assert_eq!(schedule.days.len(), 7);
        // weekend slots exist but hold no blocks
        assert!(schedule.days[5].blocks.is_empty());
        assert!(schedule.days[6].blocks.is_empty());
    }

    #[test]
    fn test_unknown_block_yields_empty_week() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_block_schedule(&context, Some("no-such-block"), &week);
        assert_eq!(schedule.days.len(), 7);
        assert!(schedule.days.iter().all(|day| day.blocks.is_empty()));
    }
}
