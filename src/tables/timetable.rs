use std::sync::Arc;

use chrono::NaiveDate;
use gtfs_structures::Trip;

use crate::tables::context::FeedCompilationContext;
use crate::tables::date::date_ops::WEEK_DAYS;
use crate::tables::service_week::ServiceWeek;
use crate::tables::trip_ops;

/// one projected call at the target stop: the route/trip/service identity and
/// the clock pair, in GTFS seconds past midnight.
#[derive(Debug, Clone)]
pub struct TimetableEntry {
    pub route_id: String,
    pub trip: Arc<Trip>,
    pub service_id: String,
    pub arrival: u32,
    pub departure: u32,
}

/// a stop's weekly timetable: one entry list per window slot. handed to the
/// renderer only after [sort_timetable] has ordered each day.
pub struct Timetable {
    pub stop_id: String,
    pub dates: [NaiveDate; WEEK_DAYS],
    pub days: [Vec<TimetableEntry>; WEEK_DAYS],
}

/// projects every stop time at `stop_id` from the trips of the services
/// active each window day, filtered to trips whose service validity interval
/// contains the day's date. entries are collected in walk order; ordering for
/// presentation is [sort_timetable]'s job, not the builder's.
///
/// an unknown stop id yields an empty timetable.
pub fn create_timetable(
    context: &FeedCompilationContext,
    stop_id: &str,
    week: &ServiceWeek,
) -> Timetable {
    let mut days: [Vec<TimetableEntry>; WEEK_DAYS] = std::array::from_fn(|_| Vec::new());

    for (day, entries) in days.iter_mut().enumerate() {
        let date = week.date(day);
        for servicetable in context.servicetables_sorted() {
            if !week.active(day, &servicetable.service_id)
                || !context.service_valid_on(&servicetable.service_id, date)
            {
                continue;
            }
            for trip in servicetable.trips.iter() {
                for stop_time in trip.stop_times.iter().filter(|st| st.stop.id == stop_id) {
                    let Some((arrival, departure)) = trip_ops::stop_time_clock(stop_time) else {
                        log::debug!(
                            "stop time {} of trip {} carries no clock values, skipped",
                            stop_time.stop_sequence,
                            trip.id
                        );
                        continue;
                    };
                    entries.push(TimetableEntry {
                        route_id: trip.route_id.clone(),
                        trip: trip.clone(),
                        service_id: servicetable.service_id.clone(),
                        arrival,
                        departure,
                    });
                }
            }
        }
    }

    Timetable {
        stop_id: stop_id.to_string(),
        dates: *week.dates(),
        days,
    }
}

/// orders each day's entries by arrival ascending. the sort is stable, so
/// entries with equal arrivals keep their insertion order.
pub fn sort_timetable(timetable: &mut Timetable) {
    for entries in timetable.days.iter_mut() {
        entries.sort_by_key(|entry| entry.arrival);
    }
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::{create_timetable, sort_timetable};
    use crate::tables::context::test::fixture_context;
    use crate::tables::service_week::ServiceWeek;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn test_timetable_day_sorted_by_arrival_with_stable_ties() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let mut timetable = create_timetable(&context, "S1", &week);
        sort_timetable(&mut timetable);

        // Monday slot: T02 07:30 through the 10:15 tie, T04's evening call last
        let monday: Vec<&str> = timetable.days[0].iter().map(|e| e.trip.id.as_str()).collect();
        assert_eq!(monday, vec!["T02", "T01", "T08", "T06", "T07", "T04"]);
        for pair in timetable.days[0].windows(2) {
            assert!(pair[0].arrival <= pair[1].arrival);
        }
        // the equal-arrival pair keeps insertion (trip id) order
        assert_eq!(timetable.days[0][3].arrival, timetable.days[0][4].arrival);
    }

    #[test]
    fn test_delete_exception_removes_service_from_one_day() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let mut timetable = create_timetable(&context, "S1", &week);
        sort_timetable(&mut timetable);

        // Wednesday 2024-03-06: service A is deleted, so T08 disappears
        assert_eq!(timetable.dates[2], ymd(2024, 3, 6));
        let wednesday: Vec<&str> =
            timetable.days[2].iter().map(|e| e.trip.id.as_str()).collect();
        assert!(!wednesday.contains(&"T08"));
        assert!(wednesday.contains(&"T01"));
    }

    #[test]
    fn test_weekend_days_are_empty_for_weekday_services() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let timetable = create_timetable(&context, "S1", &week);
        assert!(timetable.days[5].is_empty());
        assert!(timetable.days[6].is_empty());
    }

    #[test]
    fn test_unknown_stop_yields_empty_timetable() {
        let context = fixture_context();
        let week =
            ServiceWeek::resolve(context.gtfs(), ymd(2024, 3, 10)).expect("should not fail");
        let timetable = create_timetable(&context, "does-not-exist", &week);
        assert!(timetable.days.iter().all(|day| day.is_empty()));
    }
}
