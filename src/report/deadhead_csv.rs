use std::path::Path;

use chrono::NaiveDate;
use gtfs_structures::Gtfs;

use crate::tables::{first_departure, DeadheadSchedule, FeedCompilationContext, TableError};

use super::report_ops;
use super::timestamp;
use super::weekday;

const DAY_COLUMNS: usize = 6;

/// writes the weekly deadhead schedule, one file per agency, named
/// `<Agency>-DeadheadWeek-WE-<date>.csv`.
pub fn print_deadhead_week_csv(
    context: &FeedCompilationContext,
    schedule: &DeadheadSchedule,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let gtfs = context.gtfs();
    let base = format!("DeadheadWeek-WE-{}.csv", timestamp::datestamp(week_ending));
    for agency in gtfs.agencies.iter() {
        let path = output_directory.join(format!("{}-{}", agency.name, base));
        let mut writer = report_ops::create_writer(&path)?;
        for record in report_ops::title_records(gtfs) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        report_ops::write_record(&mut writer, &path, [agency.name.clone()])?;
        report_ops::write_record(&mut writer, &path, ["Transit Deadhead Schedule".to_string()])?;
        report_ops::write_record(&mut writer, &path, [report_ops::feed_range_line(context)])?;
        report_ops::write_record(&mut writer, &path, [timestamp::week_ending_stamp(week_ending)])?;

        let dates: Vec<NaiveDate> = schedule.days.iter().map(|day| day.date).collect();
        let mut ribbon: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
        for number in report_ops::day_numbers(&dates) {
            ribbon.extend(std::iter::repeat(String::new()).take(DAY_COLUMNS - 1));
            ribbon.push(number);
        }
        report_ops::write_record(&mut writer, &path, ribbon)?;

        let lang = agency.lang.as_deref();
        let mut header: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
        for date in dates.iter() {
            header.extend([
                "Block".to_string(),
                "#".to_string(),
                "Trip ID".to_string(),
                "S".to_string(),
                "D".to_string(),
                weekday::abbrev(lang, *date).to_string(),
            ]);
        }
        report_ops::write_record(&mut writer, &path, header)?;

        for record in deadhead_rows(gtfs, schedule) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// body rows: (block, route, trip id, service, direction, departure) per day
/// column.
fn deadhead_rows(gtfs: &Gtfs, schedule: &DeadheadSchedule) -> Vec<Vec<String>> {
    let depth = schedule
        .days
        .iter()
        .map(|day| day.trips.len())
        .max()
        .unwrap_or(0);

    (0..depth)
        .map(|index| {
            let mut record: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
            for day in schedule.days.iter() {
                match day.trips.get(index) {
                    Some(trip) => {
                        let previous = index
                            .checked_sub(1)
                            .and_then(|i| day.trips.get(i))
                            .and_then(|prev| first_departure(prev));
                        let clock = first_departure(trip)
                            .map(|departure| {
                                timestamp::format_clock(
                                    departure,
                                    timestamp::elided(previous, departure),
                                )
                            })
                            .unwrap_or_default();
                        record.extend([
                            trip.block_id.clone().unwrap_or_default(),
                            report_ops::route_label(gtfs, trip),
                            trip.id.clone(),
                            trip.service_id.clone(),
                            report_ops::direction_label(trip).to_string(),
                            clock,
                        ]);
                    }
                    None => record.extend(std::iter::repeat(String::new()).take(DAY_COLUMNS)),
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use chrono::NaiveDate;
    use gtfs_structures::Gtfs;

    use super::deadhead_rows;
    use crate::tables::{create_deadhead_schedule, FeedCompilationContext, ServiceWeek};

    fn fixture_context() -> FeedCompilationContext {
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("riverside");
        let gtfs = Gtfs::new(
            fixture
                .to_str()
                .unwrap_or_else(|| panic!("failed to interpret {fixture:?} as string")),
        )
        .expect("riverside fixture should parse");
        FeedCompilationContext::new(gtfs)
    }

    #[test]
    fn test_rows_carry_block_and_trip_identity() {
        let context = fixture_context();
        let week = ServiceWeek::resolve(
            context.gtfs(),
            NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid test date"),
        )
        .expect("should not fail");
        let schedule = create_deadhead_schedule(&context, &week);

        let rows = deadhead_rows(context.gtfs(), &schedule);
        assert_eq!(rows.len(), 1);
        // Monday column: the garage pull-in on block B2
        assert_eq!(rows[0][0], "B2");
        assert_eq!(rows[0][2], "T04");
        assert_eq!(rows[0][5], "21:30");
        // weekend columns are padding
        assert_eq!(rows[0][30], "");
    }
}
