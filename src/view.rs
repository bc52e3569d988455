//! Plain table rendering for command-line output.

use std::collections::HashMap;

use prettytable::{Cell, Table, row};

use crate::core::{
    Report, entry_duration, format_duration, sorted_projects, tree_display_name,
};
use crate::settings::Settings;
use crate::types::{Project, SavedReport, TimeEntry};

fn display_names(projects: &[Project]) -> HashMap<String, String> {
    sorted_projects(projects)
        .into_iter()
        .filter_map(|node| {
            let name = tree_display_name(&node);
            node.id.map(|id| (id, name))
        })
        .collect()
}

pub fn projects_table(projects: &[Project]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["ID", "PROJECT"]);
    for node in sorted_projects(projects) {
        let indent = "  ".repeat(node.depth());
        table.add_row(row![
            node.id.as_deref().unwrap_or_default(),
            format!("{indent}{}", node.name)
        ]);
    }
    table
}

pub fn entries_table(entries: &[TimeEntry], projects: &[Project], settings: &Settings) -> Table {
    let names = display_names(projects);
    let mut table = Table::new();
    let mut header = row!["ID", "DATE"];
    if settings.enable_projects {
        header.add_cell(Cell::new("PROJECT"));
    }
    for title in ["START", "END", "DURATION"] {
        header.add_cell(Cell::new(title));
    }
    if settings.enable_notes {
        header.add_cell(Cell::new("NOTES"));
    }
    table.add_row(header);

    for entry in entries {
        let mut line = row![entry.id, entry.date];
        if settings.enable_projects {
            let project = match &entry.project {
                Some(id) => names.get(id).cloned().unwrap_or_else(|| id.clone()),
                None => String::new(),
            };
            line.add_cell(Cell::new(&project));
        }
        let duration = entry_duration(entry, settings.entry_rounding(), settings.round_amount);
        for value in [
            entry.start.to_string(),
            entry.end.to_string(),
            format_duration(duration),
        ] {
            line.add_cell(Cell::new(&value));
        }
        if settings.enable_notes {
            line.add_cell(Cell::new(&entry.notes));
        }
        table.add_row(line);
    }
    table
}

pub fn report_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.add_row(row!["PROJECT", r->"TOTAL SPENT"]);
    for row in &report.rows {
        table.add_row(row![tree_display_name(&row.node), r->format_duration(row.time)]);
    }
    table.add_row(row![b->"Total", rb->format_duration(report.total())]);
    table
}

pub fn saved_reports_table(reports: &[SavedReport]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["NAME", "FROM", "TO", "PROJECTS"]);
    for report in reports {
        table.add_row(row![report.name, report.from, report.to, report.filters.len()]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DateRange, build_report};
    use chrono::NaiveDate;

    #[test]
    fn report_table_has_rows_and_total() {
        let project = Project::new("Acme", None);
        let entry = TimeEntry::new(
            Some(project.id.clone()),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            "09:00".parse().unwrap(),
            "10:30".parse().unwrap(),
            "",
        );
        let report = build_report(
            &[project],
            &[entry],
            DateRange::day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()),
            &Settings::default(),
            None,
        );
        let rendered = report_table(&report).to_string();
        assert!(rendered.contains("No project"));
        assert!(rendered.contains("Acme"));
        assert!(rendered.contains("01:30"));
        assert!(rendered.contains("Total"));
    }

    #[test]
    fn entries_table_hides_disabled_columns() {
        let settings = Settings {
            enable_notes: false,
            enable_projects: false,
            ..Settings::default()
        };
        let entry = TimeEntry::new(
            None,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            "09:00".parse().unwrap(),
            "09:20".parse().unwrap(),
            "secret",
        );
        let rendered = entries_table(&[entry], &[], &settings).to_string();
        assert!(!rendered.contains("NOTES"));
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("00:20"));
    }

    #[test]
    fn projects_table_indents_children() {
        let root = Project::new("Acme", None);
        let child = Project::new("Website", Some(root.id.clone()));
        let rendered = projects_table(&[child, root]).to_string();
        assert!(rendered.contains("  Website"));
    }
}
