use std::path::Path;

use chrono::Datelike;

use crate::tables::date::date_ops;
use crate::tables::{BlockCalendar, FeedCompilationContext, TableError};

use super::report_ops;
use super::timestamp;
use super::weekday;

const DAY_COLUMNS: usize = 3;

/// writes the month-long block calendar, one file per agency, named
/// `<Agency>-BlockMonth-<yyyy-mm>.csv`. day columns span the whole month.
pub fn print_block_month_csv(
    context: &FeedCompilationContext,
    calendar: &BlockCalendar,
    output_directory: &Path,
) -> Result<(), TableError> {
    let gtfs = context.gtfs();
    let first = date_ops::first_of_month(calendar.year, calendar.month)?;
    let base = format!("BlockMonth-{}-{:02}.csv", calendar.year, calendar.month);
    for agency in gtfs.agencies.iter() {
        let path = output_directory.join(format!("{}-{}", agency.name, base));
        let mut writer = report_ops::create_writer(&path)?;
        for record in report_ops::title_records(gtfs) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        report_ops::write_record(&mut writer, &path, [agency.name.clone()])?;
        report_ops::write_record(&mut writer, &path, ["Transit Block Calendar".to_string()])?;
        report_ops::write_record(&mut writer, &path, [report_ops::feed_range_line(context)])?;
        report_ops::write_record(&mut writer, &path, [first.format("%B %Y").to_string()])?;

        // weekday/day-number header, then the per-day column captions
        let lang = agency.lang.as_deref();
        let mut weekdays: Vec<String> = Vec::with_capacity(calendar.days.len() * DAY_COLUMNS);
        let mut captions: Vec<String> = Vec::with_capacity(calendar.days.len() * DAY_COLUMNS);
        for day in calendar.days.iter() {
            weekdays.extend([
                String::new(),
                weekday::abbrev(lang, day.date).to_string(),
                day.date.day().to_string(),
            ]);
            captions.extend(["#".to_string(), "Start".to_string(), "End".to_string()]);
        }
        report_ops::write_record(&mut writer, &path, weekdays)?;
        report_ops::write_record(&mut writer, &path, captions)?;

        for record in block_month_rows(calendar) {
            report_ops::write_record(&mut writer, &path, record)?;
        }
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// body rows: (block id, start, end) per day column, clocks eliding the hour
/// under a same-hour predecessor in their column.
fn block_month_rows(calendar: &BlockCalendar) -> Vec<Vec<String>> {
    let depth = calendar
        .days
        .iter()
        .map(|day| day.blocks.len())
        .max()
        .unwrap_or(0);

    (0..depth)
        .map(|index| {
            let mut record: Vec<String> = Vec::with_capacity(calendar.days.len() * DAY_COLUMNS);
            for day in calendar.days.iter() {
                match day.blocks.get(index) {
                    Some(block) => {
                        let previous = index.checked_sub(1).and_then(|i| day.blocks.get(i));
                        record.extend([
                            block.block_label().to_string(),
                            timestamp::format_clock(
                                block.start_at,
                                timestamp::elided(previous.map(|p| p.start_at), block.start_at),
                            ),
                            timestamp::format_clock(
                                block.end_at,
                                timestamp::elided(previous.map(|p| p.end_at), block.end_at),
                            ),
                        ]);
                    }
                    None => record.extend(std::iter::repeat(String::new()).take(DAY_COLUMNS)),
                }
            }
            record
        })
        .collect()
}
