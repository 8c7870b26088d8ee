use chrono::NaiveDate;
use clap::{value_parser, Parser};

/// command line tool compiling weekly stop timetables, vehicle block
/// schedules, monthly block calendars and deadhead reports from a GTFS feed
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct BlocktablesApp {
    /// GTFS feed source: a zip archive or an unpacked feed directory
    pub feed_source: String,
    /// rider-facing stop code selecting the stop timetable to compile
    pub stop_code: String,
    /// vehicle block id selecting the weekly block schedule to compile
    pub block_id: String,
    /// anchor date for the weekly reports; defaults to the upcoming Sunday
    #[arg(long, value_parser = value_parser!(NaiveDate))]
    pub week_ending: Option<NaiveDate>,
    /// target month for the block calendar as yyyy-mm; defaults to the
    /// current month
    #[arg(long)]
    pub month: Option<String>,
    /// also export this trip's stop points as JSON
    #[arg(long)]
    pub trip_stops: Option<String>,
    /// restrict the stop point export to timing points
    #[arg(long, default_value_t = false)]
    pub timing_points_only: bool,
    /// directory receiving the report files
    #[arg(long, default_value_t = String::from("."))]
    pub output_directory: String,
}
