//! Clock arithmetic, duration formatting, rounding and date ranges.
//!
//! Entries only ever span a single day, so durations are computed between two
//! [`ClockTime`] values on the same fixed day and are never negative.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::settings::Rounding;
use crate::types::{ClockTime, TimeEntry};

/// Minutes elapsed between `from` and `to`. An end before the start counts as zero.
pub fn calculate_duration(from: ClockTime, to: ClockTime) -> u32 {
    if to < from {
        return 0;
    }
    (to.as_time() - from.as_time()).num_minutes() as u32
}

/// Like [`calculate_duration`], parsing both `HH:MM` strings first.
pub fn duration_between(from: &str, to: &str) -> Result<u32> {
    let from: ClockTime = from.parse()?;
    let to: ClockTime = to.parse()?;
    Ok(calculate_duration(from, to))
}

/// Formats minutes as `HH:MM`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let minutes = minutes % 60;
    format!("{hours:02}:{minutes:02}")
}

/// Snaps `minutes` to a multiple of `amount`, saturating at `u32::MAX`.
pub fn round_duration(minutes: u32, rounding: Rounding, amount: u32) -> u32 {
    if amount == 0 {
        return minutes;
    }
    let (m, a) = (u64::from(minutes), u64::from(amount));
    let rounded = match rounding {
        Rounding::None => m,
        // half-up
        Rounding::Round => (m * 2 + a) / (a * 2) * a,
        Rounding::Ceil => m.div_ceil(a) * a,
        Rounding::Floor => m / a * a,
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Duration of an entry, rounded per `rounding`.
pub fn entry_duration(entry: &TimeEntry, rounding: Rounding, amount: u32) -> u32 {
    round_duration(calculate_duration(entry.start, entry.end), rounding, amount)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Comparator ordering entries by start time. `sort_by` keeps equal starts in place.
pub fn sort_by_time(direction: SortDirection) -> impl Fn(&TimeEntry, &TimeEntry) -> Ordering {
    move |a, b| match direction {
        SortDirection::Asc => a.start.cmp(&b.start),
        SortDirection::Desc => b.start.cmp(&a.start),
    }
}

/// An inclusive range of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} - {}", self.from, self.to)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    Week,
    LastWeek,
    Month,
    LastMonth,
}

pub const RANGE_PRESETS: [RangePreset; 5] = [
    RangePreset::Today,
    RangePreset::Week,
    RangePreset::LastWeek,
    RangePreset::Month,
    RangePreset::LastMonth,
];

impl RangePreset {
    /// The range this preset denotes relative to `today`. Weeks start on Monday.
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            RangePreset::Today => DateRange::day(today),
            RangePreset::Week => week_of(today),
            RangePreset::LastWeek => week_of(today - Duration::days(7)),
            RangePreset::Month => month_of(today),
            RangePreset::LastMonth => {
                let first = today.with_day(1).unwrap_or(today);
                month_of(first - Duration::days(1))
            }
        }
    }

    /// Moves `range` by `steps` periods of this preset's length.
    pub fn shift(self, range: DateRange, steps: i32) -> DateRange {
        match self {
            RangePreset::Today => {
                let days = Duration::days(steps as i64);
                DateRange::new(range.from + days, range.to + days)
            }
            RangePreset::Week | RangePreset::LastWeek => {
                let days = Duration::days(7 * steps as i64);
                DateRange::new(range.from + days, range.to + days)
            }
            RangePreset::Month | RangePreset::LastMonth => {
                let months = Months::new(steps.unsigned_abs());
                let moved = if steps >= 0 {
                    range.from.checked_add_months(months)
                } else {
                    range.from.checked_sub_months(months)
                };
                month_of(moved.unwrap_or(range.from))
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RangePreset::Today => "day",
            RangePreset::Week => "week",
            RangePreset::LastWeek => "last week",
            RangePreset::Month => "month",
            RangePreset::LastMonth => "last month",
        }
    }
}

impl FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "today" | "day" => Ok(RangePreset::Today),
            "week" => Ok(RangePreset::Week),
            "last-week" => Ok(RangePreset::LastWeek),
            "month" => Ok(RangePreset::Month),
            "last-month" => Ok(RangePreset::LastMonth),
            other => Err(format!(
                "unknown range '{other}', expected today, week, last-week, month or last-month"
            )),
        }
    }
}

fn week_of(date: NaiveDate) -> DateRange {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    DateRange::new(monday, monday + Duration::days(6))
}

fn month_of(date: NaiveDate) -> DateRange {
    let first = date.with_day(1).unwrap_or(date);
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Duration::days(1))
        .unwrap_or(first);
    DateRange::new(first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn clock(value: &str) -> ClockTime {
        value.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn duration_of_equal_times_is_zero() {
        assert_eq!(duration_between("09:00", "09:00"), Ok(0));
    }

    #[test]
    fn duration_counts_minutes() {
        assert_eq!(duration_between("09:00", "10:30"), Ok(90));
        assert_eq!(calculate_duration(clock("00:00"), clock("23:59")), 1439);
    }

    #[test]
    fn end_before_start_is_zero() {
        assert_eq!(duration_between("10:00", "09:00"), Ok(0));
    }

    #[test]
    fn malformed_clock_is_an_error() {
        assert_eq!(
            duration_between("nine", "10:00"),
            Err(Error::InvalidClock("nine".to_string()))
        );
        assert!(duration_between("09:00", "24:00").is_err());
        assert!(duration_between("09:0", "10:00").is_err());
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_duration(90), "01:30");
        assert_eq!(format_duration(5), "00:05");
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(100 * 60 + 1), "100:01");
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        assert_eq!(round_duration(60, Rounding::Round, 3_000_000_000), 0);
        assert_eq!(round_duration(60, Rounding::Ceil, u32::MAX), u32::MAX);
        assert_eq!(round_duration(u32::MAX, Rounding::Round, u32::MAX), u32::MAX);
        assert_eq!(round_duration(60, Rounding::Floor, 3_000_000_000), 0);
    }

    #[test]
    fn rounds_to_amount() {
        assert_eq!(round_duration(7, Rounding::Round, 15), 0);
        assert_eq!(round_duration(8, Rounding::Round, 15), 15);
        assert_eq!(round_duration(5, Rounding::Round, 10), 10);
        assert_eq!(round_duration(1, Rounding::Ceil, 15), 15);
        assert_eq!(round_duration(29, Rounding::Floor, 15), 15);
        assert_eq!(round_duration(29, Rounding::None, 15), 29);
        assert_eq!(round_duration(29, Rounding::Ceil, 0), 29);
    }

    #[test]
    fn sorts_by_start_time() {
        let day = date(2024, 3, 1);
        let mut entries: Vec<TimeEntry> = ["10:00", "09:00", "11:00"]
            .iter()
            .map(|start| TimeEntry::new(None, day, clock(start), clock("12:00"), ""))
            .collect();
        entries.sort_by(sort_by_time(SortDirection::Asc));
        let starts: Vec<String> = entries.iter().map(|e| e.start.to_string()).collect();
        assert_eq!(starts, ["09:00", "10:00", "11:00"]);

        entries.sort_by(sort_by_time(SortDirection::Desc));
        assert_eq!(entries[0].start, clock("11:00"));
    }

    #[test]
    fn sort_keeps_equal_starts_in_order() {
        let day = date(2024, 3, 1);
        let first = TimeEntry::new(None, day, clock("09:00"), clock("10:00"), "first");
        let second = TimeEntry::new(None, day, clock("09:00"), clock("11:00"), "second");
        let mut entries = vec![first.clone(), second.clone()];
        entries.sort_by(sort_by_time(SortDirection::Desc));
        assert_eq!(entries, vec![first, second]);
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 3));
        assert!(range.contains(date(2024, 3, 1)));
        assert!(range.contains(date(2024, 3, 3)));
        assert!(!range.contains(date(2024, 3, 4)));
    }

    #[test]
    fn presets_cover_expected_days() {
        // a Wednesday
        let today = date(2024, 3, 13);
        assert_eq!(
            RangePreset::Week.range(today),
            DateRange::new(date(2024, 3, 11), date(2024, 3, 17))
        );
        assert_eq!(
            RangePreset::LastMonth.range(today),
            DateRange::new(date(2024, 2, 1), date(2024, 2, 29))
        );
    }

    #[test]
    fn shifting_months_keeps_whole_months() {
        let march = RangePreset::Month.range(date(2024, 3, 13));
        assert_eq!(
            RangePreset::Month.shift(march, -1),
            DateRange::new(date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            RangePreset::Month.shift(march, 1),
            DateRange::new(date(2024, 4, 1), date(2024, 4, 30))
        );
    }
}
