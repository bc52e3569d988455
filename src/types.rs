use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

pub type ProjectId = String;
pub type EntryId = String;
pub type ReportId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub parent: Option<ProjectId>,
    pub created_at: DateTime<Local>,
}

impl Project {
    pub fn new(name: impl Into<String>, parent: Option<ProjectId>) -> Self {
        Self {
            id: crate::id::new_id(),
            name: name.into(),
            parent,
            created_at: Local::now(),
        }
    }
}

/// A wall-clock time within a single day, minute precision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidClock(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single span of tracked time, optionally booked on a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: EntryId,
    pub project: Option<ProjectId>,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    #[serde(default)]
    pub notes: String,
}

impl TimeEntry {
    pub fn new(
        project: Option<ProjectId>,
        date: NaiveDate,
        start: ClockTime,
        end: ClockTime,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::id::new_id(),
            project,
            date,
            start,
            end,
            notes: notes.into(),
        }
    }
}

pub enum EntryQuery {
    All,
    ByProject(Option<ProjectId>),
    ByDateRange(NaiveDate, NaiveDate),
}

/// A named report: a date range plus the project rows to show.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedReport {
    pub id: ReportId,
    pub name: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub filters: Vec<Option<ProjectId>>,
}
