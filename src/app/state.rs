use chrono::{Local, NaiveDate};
use crossterm::event::KeyCode;
use rusqlite::Connection;

use crate::core::{
    DateRange, RANGE_PRESETS, RangePreset, Report, ReportRow, build_report, sorted_projects,
    toggle_filter, total_tree_time,
};
use crate::db;
use crate::settings::Settings;
use crate::types::{EntryQuery, Project, ProjectId, TimeEntry};

use super::{AppEvent, AppView};

/// A project row of the projects view: tree position plus time including children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectTotal {
    pub name: String,
    pub depth: usize,
    pub own: u32,
    pub with_children: u32,
}

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub db: Connection,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub today: NaiveDate,
    pub preset_index: usize,
    pub range: DateRange,
    pub projects: Vec<Project>,
    pub entries: Vec<TimeEntry>,
    pub settings: Settings,
    pub report: Report,
    /// `None` shows every row.
    pub filters: Option<Vec<Option<ProjectId>>>,
    pub project_totals: Vec<ProjectTotal>,
    pub selected_row: usize,
    pub selected_entry: usize,
    pub selected_project_index: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(db: Connection, today: NaiveDate) -> Self {
        let preset_index = RANGE_PRESETS
            .iter()
            .position(|p| *p == RangePreset::Week)
            .unwrap_or(0);
        let range = RANGE_PRESETS[preset_index].range(today);
        let mut app = Self {
            running: true,
            db,
            view: AppView::Report,
            view_history: Vec::new(),
            today,
            preset_index,
            range,
            projects: Vec::new(),
            entries: Vec::new(),
            settings: Settings::default(),
            report: Report {
                range,
                rows: Vec::new(),
            },
            filters: None,
            project_totals: Vec::new(),
            selected_row: 0,
            selected_entry: 0,
            selected_project_index: 0,
            status: None,
        };
        app.reload();
        app
    }

    pub fn preset(&self) -> RangePreset {
        RANGE_PRESETS[self.preset_index]
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.set_today(Local::now().date_naive()),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    /// Moves "today" forward. A range still showing the preset's current
    /// period follows the new day; a range shifted with Left/Right stays put.
    pub fn set_today(&mut self, today: NaiveDate) {
        if today == self.today {
            return;
        }
        let following = self.range == self.preset().range(self.today);
        self.today = today;
        if following {
            self.range = self.preset().range(today);
            self.reload();
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Char('h') => self.navigate_to(AppView::Report),
            KeyCode::Char('p') => self.navigate_to(AppView::Projects),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char(' ') => self.toggle_selected_filter(),
            KeyCode::Char('a') => {
                self.filters = None;
                self.clamp_selection();
            }
            KeyCode::Tab => self.cycle_preset(1),
            KeyCode::BackTab => self.cycle_preset(-1),
            KeyCode::Left => self.shift_range(-1),
            KeyCode::Right => self.shift_range(1),
            KeyCode::Up => self.move_selection_up(),
            KeyCode::Down => self.move_selection_down(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view.clone());
            self.view = view;
        }
    }

    fn go_back(&mut self) {
        if let Some(view) = self.view_history.pop() {
            self.view = view;
        }
    }

    /// Reads projects, settings and the entries of the current range from the database.
    pub fn reload(&mut self) {
        let loaded = db::query_projects(&self.db).and_then(|projects| {
            let settings = db::load_settings(&self.db)?;
            let entries = db::query_entries(
                EntryQuery::ByDateRange(self.range.from, self.range.to),
                &self.db,
            )?;
            Ok((projects, settings, entries))
        });
        match loaded {
            Ok((projects, settings, entries)) => {
                self.projects = projects;
                self.settings = settings;
                self.entries = entries;
                self.status = None;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load data");
                self.status = Some(format!("Failed to load data: {err}"));
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.report = build_report(
            &self.projects,
            &self.entries,
            self.range,
            &self.settings,
            None,
        );
        self.project_totals = sorted_projects(&self.projects)
            .into_iter()
            .filter_map(|node| {
                let id = node.id.as_deref()?;
                let own = self
                    .report
                    .rows
                    .iter()
                    .find(|row| row.node.id.as_deref() == Some(id))
                    .map(|row| row.time)
                    .unwrap_or(0);
                let with_children = total_tree_time(
                    id,
                    &self.projects,
                    &self.entries,
                    self.range,
                    self.settings.rounds_entries(),
                    self.settings.rounding,
                    self.settings.round_amount,
                );
                Some(ProjectTotal {
                    depth: node.depth(),
                    name: node.name,
                    own,
                    with_children,
                })
            })
            .collect();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let rows = self.report.rows.len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        let entries = self.selected_report_row().map_or(0, |row| row.entries.len());
        self.selected_entry = self.selected_entry.min(entries.saturating_sub(1));
        self.selected_project_index = self
            .selected_project_index
            .min(self.project_totals.len().saturating_sub(1));
    }

    pub fn selected_report_row(&self) -> Option<&ReportRow> {
        self.report.rows.get(self.selected_row)
    }

    pub fn is_row_included(&self, row: &ReportRow) -> bool {
        self.filters
            .as_ref()
            .is_none_or(|filters| filters.contains(&row.node.id))
    }

    /// Total of the rows that pass the current filter.
    pub fn filtered_total(&self) -> u32 {
        self.report
            .rows
            .iter()
            .filter(|row| self.is_row_included(row))
            .map(|row| row.time)
            .fold(0, u32::saturating_add)
    }

    fn toggle_selected_filter(&mut self) {
        if self.view != AppView::Report {
            return;
        }
        let Some(id) = self.selected_report_row().map(|row| row.node.id.clone()) else {
            return;
        };
        let current = match &self.filters {
            Some(filters) => filters.clone(),
            None => self.report.rows.iter().map(|row| row.node.id.clone()).collect(),
        };
        self.filters = Some(toggle_filter(&current, id.as_deref()));
    }

    fn cycle_preset(&mut self, step: isize) {
        let len = RANGE_PRESETS.len() as isize;
        self.preset_index = (self.preset_index as isize + step).rem_euclid(len) as usize;
        self.range = self.preset().range(self.today);
        self.reload();
    }

    fn shift_range(&mut self, steps: i32) {
        self.range = self.preset().shift(self.range, steps);
        self.reload();
    }

    fn move_selection_up(&mut self) {
        match self.view {
            AppView::Report => self.selected_row = self.selected_row.saturating_sub(1),
            AppView::Entries => self.selected_entry = self.selected_entry.saturating_sub(1),
            AppView::Projects => {
                self.selected_project_index = self.selected_project_index.saturating_sub(1)
            }
            AppView::Help => {}
        }
    }

    fn move_selection_down(&mut self) {
        match self.view {
            AppView::Report => self.selected_row += 1,
            AppView::Entries => self.selected_entry += 1,
            AppView::Projects => self.selected_project_index += 1,
            AppView::Help => {}
        }
        self.clamp_selection();
    }

    fn open_selected(&mut self) {
        if self.view == AppView::Report && self.selected_report_row().is_some() {
            self.selected_entry = 0;
            self.navigate_to(AppView::Entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClockTime, Project};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
    }

    fn clock(value: &str) -> ClockTime {
        value.parse().unwrap()
    }

    fn seeded_app() -> App {
        let conn = db::init_in_memory().unwrap();
        let acme = Project::new("Acme", None);
        let web = Project::new("Web", Some(acme.id.clone()));
        db::create_project(&acme, &conn).unwrap();
        db::create_project(&web, &conn).unwrap();
        for (project, day, start, end) in [
            (Some(acme.id.clone()), 11, "09:00", "10:00"),
            (Some(web.id.clone()), 12, "13:00", "13:30"),
            (None, 13, "08:00", "08:15"),
            (Some(acme.id.clone()), 4, "09:00", "11:00"),
        ] {
            let entry = TimeEntry::new(
                project,
                NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                clock(start),
                clock(end),
                "",
            );
            db::create_entry(&entry, &conn).unwrap();
        }
        App::new(conn, today())
    }

    #[test]
    fn starts_on_current_week_report() {
        let app = seeded_app();
        assert_eq!(app.view, AppView::Report);
        assert_eq!(app.range.from, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(app.report.rows.len(), 3);
        assert_eq!(app.filtered_total(), 105);
    }

    #[test]
    fn projects_view_counts_children() {
        let app = seeded_app();
        let acme = &app.project_totals[0];
        assert_eq!(acme.name, "Acme");
        assert_eq!(acme.own, 60);
        assert_eq!(acme.with_children, 90);
        assert_eq!(app.project_totals[1].depth, 1);
    }

    #[test]
    fn shifting_back_a_week_loads_older_entries() {
        let mut app = seeded_app();
        app.update(AppEvent::KeyPress(KeyCode::Left));
        assert_eq!(app.range.from, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(app.filtered_total(), 120);
    }

    #[test]
    fn toggling_a_row_excludes_it_from_total() {
        let mut app = seeded_app();
        // first row is "No project" with 15 minutes
        app.update(AppEvent::KeyPress(KeyCode::Char(' ')));
        assert_eq!(app.filtered_total(), 90);
        app.update(AppEvent::KeyPress(KeyCode::Char(' ')));
        assert_eq!(app.filtered_total(), 105);
        app.update(AppEvent::KeyPress(KeyCode::Char('a')));
        assert_eq!(app.filters, None);
    }

    #[test]
    fn enter_opens_entries_and_esc_returns() {
        let mut app = seeded_app();
        app.update(AppEvent::KeyPress(KeyCode::Down));
        app.update(AppEvent::KeyPress(KeyCode::Enter));
        assert_eq!(app.view, AppView::Entries);
        assert_eq!(app.selected_report_row().unwrap().entries.len(), 1);
        app.update(AppEvent::KeyPress(KeyCode::Esc));
        assert_eq!(app.view, AppView::Report);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut app = seeded_app();
        for _ in 0..10 {
            app.update(AppEvent::KeyPress(KeyCode::Down));
        }
        assert_eq!(app.selected_row, 2);
        app.update(AppEvent::KeyPress(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn new_day_moves_the_current_range() {
        let mut app = seeded_app();
        app.set_today(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(app.range.from, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(app.filtered_total(), 0);

        let mut app = seeded_app();
        app.update(AppEvent::KeyPress(KeyCode::BackTab));
        assert_eq!(app.range, DateRange::day(today()));
        app.set_today(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(
            app.range,
            DateRange::day(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap())
        );
    }

    #[test]
    fn new_day_keeps_a_shifted_range() {
        let mut app = seeded_app();
        app.update(AppEvent::KeyPress(KeyCode::Left));
        let shifted = app.range;
        app.set_today(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(app.range, shifted);
        assert_eq!(app.today, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    }

    #[test]
    fn tab_cycles_presets() {
        let mut app = seeded_app();
        app.update(AppEvent::KeyPress(KeyCode::Tab));
        assert_eq!(app.preset(), RangePreset::LastWeek);
        app.update(AppEvent::KeyPress(KeyCode::BackTab));
        app.update(AppEvent::KeyPress(KeyCode::BackTab));
        assert_eq!(app.preset(), RangePreset::Today);
        assert_eq!(app.range, DateRange::day(today()));
    }
}
