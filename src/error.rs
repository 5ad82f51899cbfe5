use chrono::{DateTime, Utc};
use thiserror::Error;

/// Everything the library can fail with.  None of these are transient:
/// each one is something the user can correct and re-run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("an end time of \"now\" only makes sense for today; give an explicit --end-time for {date}")]
    EndNowOnPastDate { date: chrono::NaiveDate },

    #[error("exactly one of --start-time, --duration, --last, or --mark must be given ({selected} were)")]
    OriginModes { selected: usize },

    #[error("no such project {0}")]
    UnknownProject(String),

    #[error("project {0} already exists")]
    DuplicateProject(String),

    #[error("no completed stint to continue from")]
    NoPreviousStint,

    #[error("no marks available")]
    NoMarkAvailable,

    #[error("the last stint ended at {end}, more than 2 hours before this one ends; pass --force to use it anyway")]
    StaleStint { end: DateTime<Utc> },

    #[error("the mark set at {when} is more than 12 hours old; pass --force to use it anyway")]
    StaleMark { when: DateTime<Utc> },

    #[error("start {start} is not before end {end}")]
    MalformedInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("could not parse date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("could not parse time {0:?} (expected HH:MM or HH:MM:SS)")]
    InvalidTime(String),

    #[error("{time} on {date} does not exist in the local timezone")]
    NonexistentLocalTime {
        date: chrono::NaiveDate,
        time: chrono::NaiveTime,
    },

    #[error("database error: {0}")]
    Db(#[from] diesel::result::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
