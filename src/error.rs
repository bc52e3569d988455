//! Errors raised by the time and project tree logic.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid clock time '{0}', expected HH:MM")]
    InvalidClock(String),
    #[error("project '{0}' cannot be its own parent")]
    SelfParent(String),
    #[error("project '{parent}' is a descendant of '{project}'")]
    Cycle { project: String, parent: String },
    #[error("unknown project '{0}'")]
    UnknownProject(String),
    #[error("unknown rounding '{0}', expected none, round, ceil or floor")]
    InvalidRounding(String),
    #[error("unknown rounding target '{0}', expected entries or reports")]
    InvalidRoundingOn(String),
    #[error("rounding amount {0} is out of range, expected 1 to 1440 minutes")]
    InvalidRoundAmount(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
