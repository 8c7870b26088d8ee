//! CSV renderers for the compiled schedule views. every renderer receives a
//! fully built, internally sorted structure and treats it as immutable; rows
//! are appended and flushed one at a time, and a write failure aborts only
//! the report being written.
mod block_month_csv;
mod block_week_csv;
mod deadhead_csv;
mod report_ops;
mod timestamp;
mod timetable_csv;
mod weekday;

pub use block_month_csv::print_block_month_csv;
pub use block_week_csv::print_block_week_csv;
pub use deadhead_csv::print_deadhead_week_csv;
pub use timestamp::{format_clock, ClockFormat};
pub use timetable_csv::print_timetable_csv;
