//! compiles the weekly stop timetable, weekly block schedule, monthly block
//! calendar and weekly deadhead reports for one GTFS feed.
use clap::Parser;
use gtfs_blocktables::app::{operation, BlocktablesApp};

fn main() {
    env_logger::init();
    let args = match BlocktablesApp::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // a malformed invocation prints usage and exits cleanly
            let _ = e.print();
            std::process::exit(0)
        }
    };
    if let Err(e) = operation::run(&args) {
        log::error!("{e}");
        std::process::exit(1)
    }
}
