use std::path::Path;

use chrono::NaiveDate;
use gtfs_structures::{Gtfs, Stop};

use crate::tables::{FeedCompilationContext, TableError, Timetable};

use super::report_ops;
use super::timestamp;
use super::weekday;

/// writes the weekly stop timetable, one file per agency, named
/// `<Agency>-Timetable-<stopCode>-WE-<date>.csv`. expects an already sorted
/// timetable and treats it as immutable.
pub fn print_timetable_csv(
    context: &FeedCompilationContext,
    timetable: &Timetable,
    stop: Option<&Stop>,
    stop_code: &str,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let gtfs = context.gtfs();
    let base = format!(
        "Timetable-{stop_code}-WE-{}.csv",
        timestamp::datestamp(week_ending)
    );
    for agency in gtfs.agencies.iter() {
        let path = output_directory.join(format!("{}-{}", agency.name, base));
        let mut writer = report_ops::create_writer(&path)?;
        for record in report_ops::title_records(gtfs) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        report_ops::write_record(&mut writer, &path, [agency.name.clone()])?;
        report_ops::write_record(&mut writer, &path, ["Transit Schedule".to_string()])?;
        let stop_name = stop.and_then(|s| s.name.clone()).unwrap_or_default();
        report_ops::write_record(&mut writer, &path, [format!("Stop #{stop_code} - {stop_name}")])?;
        report_ops::write_record(&mut writer, &path, [report_ops::feed_range_line(context)])?;
        report_ops::write_record(&mut writer, &path, [timestamp::week_ending_stamp(week_ending)])?;

        // service id / day-of-month ribbon over the window
        let day_numbers = report_ops::day_numbers(&timetable.dates);
        let mut ribbon: Vec<String> = Vec::with_capacity(14);
        for (day, entries) in timetable.days.iter().enumerate() {
            ribbon.push(
                entries
                    .first()
                    .map(|entry| entry.service_id.clone())
                    .unwrap_or_default(),
            );
            ribbon.push(day_numbers[day].clone());
        }
        report_ops::write_record(&mut writer, &path, ribbon)?;

        let lang = agency.lang.as_deref();
        let mut header: Vec<String> = Vec::with_capacity(14);
        for date in timetable.dates.iter() {
            header.push("#".to_string());
            header.push(weekday::abbrev(lang, *date).to_string());
        }
        report_ops::write_record(&mut writer, &path, header)?;

        for record in timetable_rows(gtfs, timetable) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// body rows: one (route, arrival) cell pair per day column, padded with
/// blanks past each day's depth. arrivals elide the hour under a same-hour
/// predecessor in their column.
fn timetable_rows(gtfs: &Gtfs, timetable: &Timetable) -> Vec<Vec<String>> {
    let depth = timetable.days.iter().map(|day| day.len()).max().unwrap_or(0);
    (0..depth)
        .map(|index| {
            let mut record: Vec<String> = Vec::with_capacity(14);
            for day in timetable.days.iter() {
                match day.get(index) {
                    Some(entry) => {
                        let previous = index
                            .checked_sub(1)
                            .and_then(|i| day.get(i))
                            .map(|prev| prev.arrival);
                        let format = timestamp::elided(previous, entry.arrival);
                        record.push(report_ops::route_label(gtfs, &entry.trip));
                        record.push(timestamp::format_clock(entry.arrival, format));
                    }
                    None => {
                        record.push(String::new());
                        record.push(String::new());
                    }
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

    use super::timetable_rows;
    use crate::tables::{create_timetable, sort_timetable, FeedCompilationContext, ServiceWeek};

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
    fn test_rows_pad_columns_and_elide_same_hour_arrivals() {
        let context = fixture_context();
        let week = ServiceWeek::resolve(
            context.gtfs(),
            NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid test date"),
        )
        .expect("should not fail");
        let mut timetable = create_timetable(&context, "S1", &week);
        sort_timetable(&mut timetable);

        let rows = timetable_rows(context.gtfs(), &timetable);
        // Monday holds 6 entries, so the table is 6 rows deep
        assert_eq!(rows.len(), 6);
        // row 0, Monday column: route 10 arriving 07:30
        assert_eq!(rows[0][0], "10");
        assert_eq!(rows[0][1], "07:30");
        // the 10:15 pair elides the second hour
        assert_eq!(rows[3][1], "10:15");
        assert_eq!(rows[4][1], ":15");
        // the evening call renders its full clock again
        assert_eq!(rows[5][0], "20");
        assert_eq!(rows[5][1], "21:30");
        // Saturday column (index 5) is blank padding
        assert_eq!(rows[0][10], "");
        assert_eq!(rows[0][11], "");
    }
}
