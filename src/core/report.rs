//! Per-project totals and entry listings over a date range.

use crate::core::time::{DateRange, SortDirection, calculate_duration, entry_duration, round_duration, sort_by_time};
use crate::core::tree::{ProjectTreeNode, descendant_ids, sorted_projects};
use crate::settings::{Rounding, Settings};
use crate::types::{Project, ProjectId, TimeEntry};

/// Entries booked on `project` (`None` for no project) whose date lies in `range`.
pub fn project_time_entries(
    project: Option<&str>,
    entries: &[TimeEntry],
    range: DateRange,
) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|entry| entry.project.as_deref() == project)
        .filter(|entry| range.contains(entry.date))
        .cloned()
        .collect()
}

fn sum_minutes<'a>(
    entries: impl Iterator<Item = &'a TimeEntry>,
    per_entry: bool,
    rounding: Rounding,
    amount: u32,
) -> u32 {
    if per_entry {
        entries
            .map(|e| entry_duration(e, rounding, amount))
            .fold(0, u32::saturating_add)
    } else {
        let total = entries
            .map(|e| calculate_duration(e.start, e.end))
            .fold(0, u32::saturating_add);
        round_duration(total, rounding, amount)
    }
}

/// Minutes spent on `project` inside `range`.
///
/// With `per_entry` each entry is rounded before summing; otherwise the sum is
/// rounded once.
pub fn total_project_time(
    project: Option<&str>,
    entries: &[TimeEntry],
    range: DateRange,
    per_entry: bool,
    rounding: Rounding,
    amount: u32,
) -> u32 {
    let matching = entries
        .iter()
        .filter(|entry| entry.project.as_deref() == project)
        .filter(|entry| range.contains(entry.date));
    sum_minutes(matching, per_entry, rounding, amount)
}

/// Like [`total_project_time`], also counting every descendant of `project`.
pub fn total_tree_time(
    project: &str,
    projects: &[Project],
    entries: &[TimeEntry],
    range: DateRange,
    per_entry: bool,
    rounding: Rounding,
    amount: u32,
) -> u32 {
    let mut ids = descendant_ids(project, projects);
    ids.push(project.to_string());
    let matching = entries.iter().filter(|entry| {
        entry
            .project
            .as_ref()
            .is_some_and(|id| ids.contains(id))
            && range.contains(entry.date)
    });
    sum_minutes(matching, per_entry, rounding, amount)
}

/// Adds `filter` when absent, removes it when present.
pub fn toggle_filter(filters: &[Option<ProjectId>], filter: Option<&str>) -> Vec<Option<ProjectId>> {
    if filters.iter().any(|f| f.as_deref() == filter) {
        filters
            .iter()
            .filter(|f| f.as_deref() != filter)
            .cloned()
            .collect()
    } else {
        let mut next = filters.to_vec();
        next.push(filter.map(str::to_string));
        next
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub node: ProjectTreeNode,
    pub time: u32,
    pub entries: Vec<TimeEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub range: DateRange,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn total(&self) -> u32 {
        self.rows.iter().map(|row| row.time).fold(0, u32::saturating_add)
    }

    pub fn entry_count(&self) -> usize {
        self.rows.iter().map(|row| row.entries.len()).sum()
    }
}

/// Every project row (plus "No project") that passes `filters`.
///
/// `filters == None` keeps all rows. Row entries are sorted by start time.
pub fn build_report(
    projects: &[Project],
    entries: &[TimeEntry],
    range: DateRange,
    settings: &Settings,
    filters: Option<&[Option<ProjectId>]>,
) -> Report {
    let rows = std::iter::once(ProjectTreeNode::no_project())
        .chain(sorted_projects(projects))
        .filter(|node| filters.is_none_or(|f| f.contains(&node.id)))
        .map(|node| {
            let id = node.id.as_deref();
            let time = total_project_time(
                id,
                entries,
                range,
                settings.rounds_entries(),
                settings.rounding,
                settings.round_amount,
            );
            let mut matching = project_time_entries(id, entries, range);
            matching.sort_by(sort_by_time(SortDirection::Asc));
            ReportRow {
                node,
                time,
                entries: matching,
            }
        })
        .collect();
    Report { range, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RoundingOn;
    use chrono::{Local, NaiveDate};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn entry(project: Option<&str>, day: u32, start: &str, end: &str) -> TimeEntry {
        TimeEntry::new(
            project.map(str::to_string),
            date(day),
            start.parse().unwrap(),
            end.parse().unwrap(),
            "",
        )
    }

    fn project(id: &str, parent: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent: parent.map(str::to_string),
            created_at: Local::now(),
        }
    }

    #[test]
    fn totals_entries_in_range() {
        let entries = vec![entry(Some("A"), 1, "09:00", "10:00")];
        let range = DateRange::day(date(1));
        assert_eq!(
            total_project_time(Some("A"), &entries, range, false, Rounding::None, 0),
            60
        );
    }

    #[test]
    fn range_excluding_the_entry_totals_zero() {
        let entries = vec![entry(Some("A"), 1, "09:00", "10:00")];
        let range = DateRange::new(date(2), date(5));
        assert_eq!(
            total_project_time(Some("A"), &entries, range, false, Rounding::None, 0),
            0
        );
    }

    #[test]
    fn none_matches_entries_without_project() {
        let entries = vec![
            entry(None, 1, "09:00", "09:30"),
            entry(Some("A"), 1, "10:00", "11:00"),
        ];
        let range = DateRange::day(date(1));
        assert_eq!(project_time_entries(None, &entries, range).len(), 1);
        assert_eq!(
            total_project_time(None, &entries, range, true, Rounding::None, 15),
            30
        );
    }

    #[test]
    fn per_entry_rounding_differs_from_total_rounding() {
        let entries = vec![
            entry(Some("A"), 1, "09:00", "09:05"),
            entry(Some("A"), 1, "10:00", "10:05"),
        ];
        let range = DateRange::day(date(1));
        assert_eq!(
            total_project_time(Some("A"), &entries, range, true, Rounding::Ceil, 15),
            30
        );
        assert_eq!(
            total_project_time(Some("A"), &entries, range, false, Rounding::Ceil, 15),
            15
        );
    }

    #[test]
    fn totals_saturate_with_huge_rounding_amounts() {
        let entries = vec![
            entry(Some("A"), 1, "09:00", "09:05"),
            entry(Some("A"), 1, "10:00", "10:05"),
        ];
        let range = DateRange::day(date(1));
        assert_eq!(
            total_project_time(Some("A"), &entries, range, true, Rounding::Ceil, u32::MAX),
            u32::MAX
        );
        assert_eq!(
            total_project_time(Some("A"), &entries, range, true, Rounding::Round, 3_000_000_000),
            0
        );
    }

    #[test]
    fn tree_time_includes_descendants() {
        let projects = vec![project("a", None), project("b", Some("a")), project("c", Some("b"))];
        let entries = vec![
            entry(Some("a"), 1, "09:00", "10:00"),
            entry(Some("c"), 2, "09:00", "09:30"),
            entry(None, 2, "09:00", "17:00"),
        ];
        let range = DateRange::new(date(1), date(3));
        assert_eq!(
            total_tree_time("a", &projects, &entries, range, false, Rounding::None, 0),
            90
        );
        assert_eq!(
            total_tree_time("b", &projects, &entries, range, false, Rounding::None, 0),
            30
        );
    }

    #[test]
    fn report_lists_no_project_first_and_sorts_entries() {
        let projects = vec![project("a", None)];
        let entries = vec![
            entry(Some("a"), 1, "13:00", "14:00"),
            entry(Some("a"), 1, "08:00", "09:00"),
            entry(None, 1, "10:00", "10:10"),
        ];
        let settings = Settings::default();
        let report = build_report(&projects, &entries, DateRange::day(date(1)), &settings, None);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].node.id, None);
        assert_eq!(report.rows[0].time, 10);
        let starts: Vec<String> = report.rows[1].entries.iter().map(|e| e.start.to_string()).collect();
        assert_eq!(starts, ["08:00", "13:00"]);
        assert_eq!(report.total(), 130);
        assert_eq!(report.entry_count(), 3);
    }

    #[test]
    fn report_honours_filters_and_rounding_target() {
        let projects = vec![project("a", None), project("b", None)];
        let entries = vec![
            entry(Some("a"), 1, "09:00", "09:05"),
            entry(Some("a"), 1, "10:00", "10:05"),
            entry(Some("b"), 1, "10:00", "11:00"),
        ];
        let settings = Settings {
            rounding: Rounding::Ceil,
            round_amount: 15,
            rounding_on: RoundingOn::Reports,
            ..Settings::default()
        };
        let filters = vec![Some("a".to_string())];
        let report = build_report(
            &projects,
            &entries,
            DateRange::day(date(1)),
            &settings,
            Some(&filters),
        );
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].time, 15);
    }

    #[test]
    fn toggling_filters() {
        let filters = vec![None, Some("a".to_string())];
        assert_eq!(toggle_filter(&filters, None), vec![Some("a".to_string())]);
        assert_eq!(
            toggle_filter(&filters, Some("b")),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }
}
