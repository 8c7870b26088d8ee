pub mod date;

mod block_calendar;
mod block_schedule;
mod context;
mod deadhead;
mod grouping;
mod service_week;
mod stop_points;
mod tables_error;
mod timetable;
mod trip_ops;

pub use block_calendar::{create_block_calendar, BlockCalendar, MonthSegments, WeekSegment};
pub use block_schedule::{create_block_schedule, week_schedule, Block, BlockDay, BlockSchedule};
pub use context::FeedCompilationContext;
pub use deadhead::{create_deadhead_schedule, DeadheadDay, DeadheadSchedule};
pub use grouping::{Blocktable, Servicetable};
pub use service_week::ServiceWeek;
pub use stop_points::{find_stop_points, StopPoint};
pub use tables_error::TableError;
pub use timetable::{create_timetable, sort_timetable, Timetable, TimetableEntry};
pub(crate) use trip_ops::first_departure;
