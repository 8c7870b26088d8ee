use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use gtfs_structures::{Gtfs, Trip};

use crate::tables::{first_departure, BlockSchedule, FeedCompilationContext, TableError};

use super::report_ops;
use super::timestamp;
use super::weekday;

const DAY_COLUMNS: usize = 5;

/// writes one block's weekly schedule, one file per agency, named
/// `<Agency>-BlockWeek-<blockId>-WE-<date>.csv`.
pub fn print_block_week_csv(
    context: &FeedCompilationContext,
    schedule: &BlockSchedule,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let gtfs = context.gtfs();
    let block_label = schedule.block_id.as_deref().unwrap_or_default();
    let base = format!(
        "BlockWeek-{block_label}-WE-{}.csv",
        timestamp::datestamp(week_ending)
    );
    for agency in gtfs.agencies.iter() {
        let path = output_directory.join(format!("{}-{}", agency.name, base));
        let mut writer = report_ops::create_writer(&path)?;
        for record in report_ops::title_records(gtfs) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        report_ops::write_record(&mut writer, &path, [agency.name.clone()])?;
        report_ops::write_record(&mut writer, &path, ["Transit Block Schedule".to_string()])?;
        report_ops::write_record(&mut writer, &path, [format!("Block #{block_label}")])?;
        report_ops::write_record(&mut writer, &path, [report_ops::feed_range_line(context)])?;
        report_ops::write_record(&mut writer, &path, [timestamp::week_ending_stamp(week_ending)])?;

        let dates: Vec<NaiveDate> = schedule.days.iter().map(|day| day.date).collect();
        let day_numbers = report_ops::day_numbers(&dates);
        let mut ribbon: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
        for number in day_numbers {
            ribbon.extend([String::new(), String::new(), String::new(), String::new()]);
            ribbon.push(number);
        }
        report_ops::write_record(&mut writer, &path, ribbon)?;

        let lang = agency.lang.as_deref();
        let mut header: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
        for date in dates.iter() {
            header.extend([
                "#".to_string(),
                "Trip ID".to_string(),
                "S".to_string(),
                "D".to_string(),
                weekday::abbrev(lang, *date).to_string(),
            ]);
        }
        report_ops::write_record(&mut writer, &path, header)?;

        for record in block_week_rows(gtfs, schedule) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// body rows: (route, trip id, service, direction, departure) per day column,
/// departure eliding the hour under a same-hour predecessor.
fn block_week_rows(gtfs: &Gtfs, schedule: &BlockSchedule) -> Vec<Vec<String>> {
    let day_trips: Vec<&[Arc<Trip>]> = schedule
        .days
        .iter()
        .map(|day| {
            day.blocks
                .first()
                .map(|block| block.trips.as_slice())
                .unwrap_or(&[])
        })
        .collect();
    let depth = day_trips.iter().map(|trips| trips.len()).max().unwrap_or(0);

    (0..depth)
        .map(|index| {
            let mut record: Vec<String> = Vec::with_capacity(7 * DAY_COLUMNS);
            for trips in day_trips.iter() {
                match trips.get(index) {
                    Some(trip) => {
                        let previous = index
                            .checked_sub(1)
                            .and_then(|i| trips.get(i))
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
