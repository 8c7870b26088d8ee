//! orchestration of one compilation run: build the frozen context from the
//! feed, then compile and render each requested report. a failure inside one
//! report is logged and isolated; the remaining reports still run.
use std::fs::File;
use std::path::Path;

use chrono::{Datelike, Local, NaiveDate};
use gtfs_structures::Gtfs;

use crate::app::BlocktablesApp;
use crate::report;
use crate::tables::date::date_ops;
use crate::tables::{
    create_block_calendar, create_block_schedule, create_deadhead_schedule, create_timetable,
    find_stop_points, sort_timetable, FeedCompilationContext, ServiceWeek, StopPoint, TableError,
};

pub fn run(app: &BlocktablesApp) -> Result<(), TableError> {
    // a feed error at the boundary is fatal to the process, not recoverable
    let gtfs = Gtfs::new(&app.feed_source)?;
    log::info!(
        "parsed {} agencies, {} stops, {} routes, {} trips",
        gtfs.agencies.len(),
        gtfs.stops.len(),
        gtfs.routes.len(),
        gtfs.trips.len()
    );
    let context = FeedCompilationContext::new(gtfs);

    let today = Local::now().date_naive();
    let week_ending = match app.week_ending {
        Some(date) => date,
        None => date_ops::upcoming_sunday(today)?,
    };
    let (year, month) = match app.month.as_deref() {
        Some(month) => parse_month(month)?,
        None => (today.year(), today.month()),
    };
    let output_directory = Path::new(&app.output_directory);
    // an empty block id addresses the degenerate no-block bucket
    let block_id = (!app.block_id.is_empty()).then_some(app.block_id.as_str());

    report_step(
        "stop timetable",
        run_timetable(&context, &app.stop_code, week_ending, output_directory),
    );
    report_step(
        "block schedule",
        run_block_week(&context, block_id, week_ending, output_directory),
    );
    report_step(
        "block calendar",
        run_block_month(&context, year, month, output_directory),
    );
    report_step(
        "deadhead schedule",
        run_deadhead(&context, week_ending, output_directory),
    );
    if let Some(trip_id) = app.trip_stops.as_deref() {
        report_step(
            "trip stop points",
            run_trip_stops(&context, trip_id, app.timing_points_only, output_directory),
        );
    }
    Ok(())
}

fn report_step(name: &str, result: Result<(), TableError>) {
    if let Err(e) = result {
        log::error!("{name} report failed: {e}");
    }
}

fn run_timetable(
    context: &FeedCompilationContext,
    stop_code: &str,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let week = ServiceWeek::resolve(context.gtfs(), week_ending)?;
    let stop = context.stop_by_code(stop_code);
    let stop_id = match stop.as_deref() {
        Some(stop) => stop.id.clone(),
        None => {
            // unknown code compiles to an empty timetable, not an error
            log::warn!("stop code {stop_code} matches no stop in the feed");
            stop_code.to_string()
        }
    };
    let mut timetable = create_timetable(context, &stop_id, &week);
    sort_timetable(&mut timetable);
    report::print_timetable_csv(
        context,
        &timetable,
        stop.as_deref(),
        stop_code,
        week_ending,
        output_directory,
    )
}

fn run_block_week(
    context: &FeedCompilationContext,
    block_id: Option<&str>,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let week = ServiceWeek::resolve(context.gtfs(), week_ending)?;
    let schedule = create_block_schedule(context, block_id, &week);
    report::print_block_week_csv(context, &schedule, week_ending, output_directory)
}

fn run_block_month(
    context: &FeedCompilationContext,
    year: i32,
    month: u32,
    output_directory: &Path,
) -> Result<(), TableError> {
    let calendar = create_block_calendar(context, year, month)?;
    report::print_block_month_csv(context, &calendar, output_directory)
}

fn run_deadhead(
    context: &FeedCompilationContext,
    week_ending: NaiveDate,
    output_directory: &Path,
) -> Result<(), TableError> {
    let week = ServiceWeek::resolve(context.gtfs(), week_ending)?;
    let schedule = create_deadhead_schedule(context, &week);
    report::print_deadhead_week_csv(context, &schedule, week_ending, output_directory)
}

fn run_trip_stops(
    context: &FeedCompilationContext,
    trip_id: &str,
    timing_points_only: bool,
    output_directory: &Path,
) -> Result<(), TableError> {
    let stop_points: Vec<StopPoint> = find_stop_points(context, trip_id, timing_points_only);
    let path = output_directory.join(format!("TripStops-{trip_id}.json"));
    let file = File::create(&path)
        .map_err(|e| TableError::ReportCreateError(path.display().to_string(), e))?;
    serde_json::to_writer_pretty(file, &stop_points)
        .map_err(|e| TableError::ReportWriteError(path.display().to_string(), e.to_string()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// parses a yyyy-mm month argument.
fn parse_month(month: &str) -> Result<(i32, u32), TableError> {
    let invalid = || TableError::InvalidMonthError(month.to_string());
    let (y, m) = month.split_once('-').ok_or_else(invalid)?;
    let year: i32 = y.parse().map_err(|_| invalid())?;
    let month_number: u32 = m.parse().map_err(|_| invalid())?;
    // range check via the same path the calendar builder uses
    date_ops::first_of_month(year, month_number)?;
    Ok((year, month_number))
}
