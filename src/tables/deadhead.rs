use std::sync::Arc;

use chrono::NaiveDate;
use gtfs_structures::{PickupDropOffType, Trip};

use crate::tables::context::FeedCompilationContext;
use crate::tables::date::date_ops::WEEK_DAYS;
use crate::tables::service_week::ServiceWeek;
use crate::tables::trip_ops;

/// a date and the non-revenue trips active on it.
#[derive(Debug, Clone)]
pub struct DeadheadDay {
    pub date: NaiveDate,
    pub trips: Vec<Arc<Trip>>,
}

/// weekly deadhead schedule: always 7 day slots.
pub struct DeadheadSchedule {
    pub days: [DeadheadDay; WEEK_DAYS],
}

/// scans every blocktable's trips with the same per-day activation test as
/// the block schedule builder and collects the trips carrying at least one
/// unserviced stop time (no pickup and no dropoff). classification is
/// per-trip: one unserviced call marks the whole trip as deadhead, since the
/// report's unit of analysis is the trip/block lifecycle.
pub fn create_deadhead_schedule(
    context: &FeedCompilationContext,
    week: &ServiceWeek,
) -> DeadheadSchedule {
    let mut days = (*week.dates()).map(|date| DeadheadDay {
        date,
        trips: Vec::new(),
    });

    for (day, deadhead_day) in days.iter_mut().enumerate() {
        let date = week.date(day);
        for blocktable in context.blocktables_sorted() {
            for servicetable in blocktable.servicetables_sorted() {
                if !week.active(day, &servicetable.service_id)
                    || !context.service_valid_on(&servicetable.service_id, date)
                {
                    continue;
                }
                for trip in servicetable.trips.iter() {
                    if has_unserviced_stop(trip) {
                        deadhead_day.trips.push(trip.clone());
                    }
                }
            }
        }
        deadhead_day
            .trips
            .sort_by_key(|trip| trip_ops::first_departure(trip).unwrap_or(u32::MAX));
    }

    DeadheadSchedule { days }
}

/// true when any stop time of the trip is unserviced. partial restrictions
/// (pickup-only or dropoff-only) never classify the trip; they are surfaced
/// as diagnostics.
fn has_unserviced_stop(trip: &Trip) -> bool {
    let mut unserviced = 0usize;
    for stop_time in trip.stop_times.iter() {
        if trip_ops::unserviced(stop_time) {
            unserviced += 1;
        } else if stop_time.pickup_type == PickupDropOffType::NotAvailable {
            log::debug!(
                "no pickup at stop {} (seq {}) on trip {}",
                stop_time.stop.id,
                stop_time.stop_sequence,
                trip.id
            );
        } else if stop_time.drop_off_type == PickupDropOffType::NotAvailable {
            log::debug!(
                "no dropoff at stop {} (seq {}) on trip {}",
                stop_time.stop.id,
                stop_time.stop_sequence,
                trip.id
            );
        }
    }
    unserviced > 0
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::create_deadhead_schedule;
    use crate::tables::context::test::fixture_context;
    use crate::tables::service_week::ServiceWeek;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn test_trip_with_unserviced_stop_is_included_whole() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_deadhead_schedule(&context, &week);

        // T04 ends with a (NoService, NoService) garage pull-in
        let monday: Vec<&str> = schedule.days[0].trips.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(monday, vec!["T04"]);
        // the whole trip is listed, not just the unserviced tail
        assert_eq!(schedule.days[0].trips[0].stop_times.len(), 3);
    }

    #[test]
    fn test_partial_restrictions_do_not_classify() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_deadhead_schedule(&context, &week);

        // T05 has a pickup-only restriction; regular trips have none at all
        for day in schedule.days.iter() {
            assert!(day.trips.iter().all(|t| t.id != "T05"));
            assert!(day.trips.iter().all(|t| t.id != "T01"));
        }
    }

    #[test]
    fn test_schedule_has_seven_slots_and_respects_activation() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let schedule = create_deadhead_schedule(&context, &week);
        assert_eq!(schedule.days.len(), 7);
        // weekday service only: weekend slots stay empty
        assert!(schedule.days[5].trips.is_empty());
        assert!(schedule.days[6].trips.is_empty());
    }
}
