use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("failed to parse GTFS feed into `Gtfs` struct: {0}")]
    FeedReadError(#[from] gtfs_structures::Error),
    #[error("failed to create report file '{0}': {1}")]
    ReportCreateError(String, std::io::Error),
    #[error("failed to write report file '{0}': {1}")]
    ReportWriteError(String, String),
    #[error("date overflow stepping {0} by {1} days")]
    DateOverflowError(NaiveDate, i64),
    #[error("invalid month: {0}")]
    InvalidMonthError(String),
    #[error("{0}")]
    OtherError(String),
}
