//! compilation of derived transit schedule views from parsed GTFS feeds:
//! per-stop weekly timetables, per-vehicle-block weekly schedules, month-long
//! block calendars, and deadhead (non-revenue movement) schedules.
pub mod app;
pub mod report;
pub mod tables;
