//! shared plumbing for the CSV report writers: file/writer construction,
//! per-row append-and-flush, and the header fragments common to every report.
use std::fs::File;
use std::path::Path;

use chrono::Datelike;
use csv::QuoteStyle;
use gtfs_structures::{DirectionType, Gtfs, Trip};

use crate::tables::{FeedCompilationContext, TableError};

use super::timestamp;

/// builds the CSV writer for one report file. reports carry multi-line
/// headers and ragged day columns, so records are written flexible-length
/// with no serialized header row.
pub(crate) fn create_writer(path: &Path) -> Result<csv::Writer<File>, TableError> {
    let file = File::create(path)
        .map_err(|e| TableError::ReportCreateError(path.display().to_string(), e))?;
    Ok(csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(file))
}

/// appends one record and flushes it. a failure here aborts the remainder of
/// the report; files already completed are unaffected.
pub(crate) fn write_record<I, F>(
    writer: &mut csv::Writer<File>,
    path: &Path,
    record: I,
) -> Result<(), TableError>
where
    I: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    writer
        .write_record(record)
        .map_err(|e| TableError::ReportWriteError(path.display().to_string(), e.to_string()))?;
    writer
        .flush()
        .map_err(|e| TableError::ReportWriteError(path.display().to_string(), e.to_string()))
}

/// publisher and version title lines, when the feed publishes them.
pub(crate) fn title_records(gtfs: &Gtfs) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    if let Some(feed_info) = gtfs.feed_info.first() {
        records.push(vec![feed_info.name.clone()]);
        records.push(vec![format!(
            "Version:{}",
            feed_info.version.clone().unwrap_or_default()
        )]);
    }
    records
}

/// "From: <start> - To: <end>" feed validity line.
pub(crate) fn feed_range_line(context: &FeedCompilationContext) -> String {
    match context.feed_date_range() {
        Some((start, end)) => format!(
            "From: {} - To: {}",
            timestamp::datestamp(start),
            timestamp::datestamp(end)
        ),
        None => String::from("From: - To: -"),
    }
}

/// display name for a trip's route: route short name, falling back to the
/// trip short name, falling back to the first word of the headsign.
pub(crate) fn route_label(gtfs: &Gtfs, trip: &Trip) -> String {
    gtfs.routes
        .get(&trip.route_id)
        .and_then(|route| route.short_name.clone())
        .filter(|name| !name.is_empty())
        .or_else(|| trip.trip_short_name.clone().filter(|name| !name.is_empty()))
        .or_else(|| {
            trip.trip_headsign
                .as_deref()
                .and_then(|headsign| headsign.split_whitespace().next())
                .map(String::from)
        })
        .unwrap_or_default()
}

pub(crate) fn direction_label(trip: &Trip) -> &'static str {
    match trip.direction_id {
        Some(DirectionType::Outbound) => "0",
        Some(DirectionType::Inbound) => "1",
        None => "",
    }
}

/// day-of-month labels for a window's dates.
pub(crate) fn day_numbers(dates: &[chrono::NaiveDate]) -> Vec<String> {
    dates.iter().map(|date| date.day().to_string()).collect()
}
