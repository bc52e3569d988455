//! CLI argument parsing and command handling.

use std::path::PathBuf;

use anyhow::{Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;

use crate::core::{DateRange, RangePreset, build_report, sorted_projects, tree_display_name};
use crate::settings::{Rounding, RoundingOn, check_round_amount};
use crate::types::{ClockTime, EntryQuery, Project, ProjectId, SavedReport, TimeEntry};
use crate::{db, view};

#[derive(Parser)]
#[command(
    name = "thyme",
    version,
    about = "Thyme - A terminal-based time tracker"
)]
pub struct Cli {
    /// Database file; defaults to $THYME_DB or the user data directory
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Print totals per project for a date range
    #[command(args_conflicts_with_subcommands = true)]
    Report {
        #[command(subcommand)]
        command: Option<ReportCommand>,
        #[command(flatten)]
        args: ReportArgs,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Write all data to a JSON file
    Export { path: PathBuf },
    /// Replace all data with the contents of a JSON file
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    Add {
        name: String,
        #[arg(short = 'p', long = "parent")]
        parent: Option<String>,
    },
    List,
    Rename {
        name: String,
        new_name: String,
    },
    /// Move a project under another one, or to the top level without --parent
    Move {
        name: String,
        #[arg(short = 'p', long = "parent")]
        parent: Option<String>,
    },
    Remove {
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    Add {
        #[arg(short = 's', long = "start")]
        start: ClockTime,
        #[arg(short = 'e', long = "end")]
        end: ClockTime,
        /// Day of the entry (YYYY-MM-DD), today when omitted
        #[arg(short = 'd', long = "date")]
        date: Option<NaiveDate>,
        #[arg(short = 'p', long = "project")]
        project: Option<String>,
        #[arg(short = 'n', long = "notes")]
        notes: Option<String>,
    },
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        #[arg(short = 'p', long = "project")]
        project: Option<String>,
    },
    Edit {
        id: String,
        #[arg(short = 's', long = "start")]
        start: Option<ClockTime>,
        #[arg(short = 'e', long = "end")]
        end: Option<ClockTime>,
        #[arg(short = 'd', long = "date")]
        date: Option<NaiveDate>,
        #[arg(short = 'p', long = "project", conflicts_with = "no_project")]
        project: Option<String>,
        /// Detach the entry from its project
        #[arg(long)]
        no_project: bool,
        #[arg(short = 'n', long = "notes")]
        notes: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[arg(long)]
    pub from: Option<NaiveDate>,
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// today, week, last-week, month or last-month (default: week)
    #[arg(long)]
    pub range: Option<RangePreset>,
    /// Only show these projects; repeatable
    #[arg(short = 'p', long = "project")]
    pub projects: Vec<String>,
    /// Include the "No project" row when filtering by project
    #[arg(long)]
    pub no_project: bool,
    /// List the entries below each project
    #[arg(long)]
    pub detailed: bool,
    /// Store the report under this name
    #[arg(long)]
    pub save: Option<String>,
    /// Start from a saved report
    #[arg(long)]
    pub load: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommand {
    /// List saved reports
    Saved,
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Set {
        #[arg(long)]
        rounding: Option<Rounding>,
        /// Rounding step in minutes
        #[arg(long)]
        amount: Option<u32>,
        /// Round single entries or report totals
        #[arg(long)]
        on: Option<RoundingOn>,
        #[arg(long)]
        notes: Option<bool>,
        #[arg(long)]
        projects: Option<bool>,
    },
}

/// Execute a CLI command.
pub fn run(command: Command, conn: &Connection) -> Result<()> {
    match command {
        Command::Project { command } => match command {
            ProjectCommand::Add { name, parent } => handle_project_add(name, parent, conn)?,
            ProjectCommand::List => handle_project_list(conn)?,
            ProjectCommand::Rename { name, new_name } => {
                handle_project_rename(&name, &new_name, conn)?
            }
            ProjectCommand::Move { name, parent } => handle_project_move(&name, parent, conn)?,
            ProjectCommand::Remove { name } => handle_project_remove(&name, conn)?,
        },
        Command::Entry { command } => match command {
            EntryCommand::Add {
                start,
                end,
                date,
                project,
                notes,
            } => handle_entry_add(start, end, date, project, notes, conn)?,
            EntryCommand::List { from, to, project } => handle_entry_list(from, to, project, conn)?,
            EntryCommand::Edit {
                id,
                start,
                end,
                date,
                project,
                no_project,
                notes,
            } => {
                let project = match (project, no_project) {
                    (_, true) => Some(None),
                    (Some(name), false) => Some(Some(name)),
                    (None, false) => None,
                };
                handle_entry_edit(&id, start, end, date, project, notes, conn)?
            }
            EntryCommand::Remove { id } => handle_entry_remove(&id, conn)?,
        },
        Command::Report { command, args } => match command {
            Some(ReportCommand::Saved) => {
                view::saved_reports_table(&db::query_reports(conn)?).printstd();
            }
            Some(ReportCommand::Delete { name }) => {
                if !db::delete_report(&name, conn)? {
                    println!("Report '{name}' not found.");
                }
            }
            None => handle_report(args, conn)?,
        },
        Command::Settings { command } => match command {
            SettingsCommand::Show => handle_settings_show(conn)?,
            SettingsCommand::Set {
                rounding,
                amount,
                on,
                notes,
                projects,
            } => handle_settings_set(rounding, amount, on, notes, projects, conn)?,
        },
        Command::Export { path } => {
            let snapshot = db::export_snapshot(conn)?;
            db::write_snapshot(&snapshot, &path)?;
            println!(
                "Exported {} projects and {} entries to {}",
                snapshot.projects.len(),
                snapshot.entries.len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let snapshot = db::read_snapshot(&path)?;
            db::import_snapshot(&snapshot, conn)?;
            println!(
                "Imported {} projects and {} entries",
                snapshot.projects.len(),
                snapshot.entries.len()
            );
        }
    }
    Ok(())
}

/// Finds a project by id, by name, or by its full path such as `Acme > Website`.
pub fn resolve_project<'a>(query: &str, projects: &'a [Project]) -> Result<&'a Project> {
    if let Some(project) = projects.iter().find(|p| p.id == query) {
        return Ok(project);
    }
    let by_name: Vec<&Project> = projects.iter().filter(|p| p.name == query).collect();
    match by_name.as_slice() {
        [single] => return Ok(*single),
        [] => {}
        _ => {
            tracing::debug!(query, matches = by_name.len(), "ambiguous project name");
        }
    }
    let by_path = sorted_projects(projects)
        .into_iter()
        .find(|node| tree_display_name(node) == query)
        .and_then(|node| node.id);
    if let Some(id) = by_path {
        if let Some(project) = projects.iter().find(|p| p.id == id) {
            return Ok(project);
        }
    }
    if by_name.len() > 1 {
        bail!("Multiple projects are named '{query}', use the full path (e.g. 'Parent > {query}')");
    }
    Err(anyhow!("Project '{query}' not found"))
}

fn resolve_project_id(query: &str, conn: &Connection) -> Result<ProjectId> {
    let projects = db::query_projects(conn)?;
    Ok(resolve_project(query, &projects)?.id.clone())
}

fn handle_project_add(name: String, parent: Option<String>, conn: &Connection) -> Result<()> {
    let parent = match parent {
        Some(parent) => Some(resolve_project_id(&parent, conn)?),
        None => None,
    };
    let project = Project::new(name, parent);
    db::create_project(&project, conn)?;
    println!("Created project '{}' ({})", project.name, project.id);
    Ok(())
}

fn handle_project_list(conn: &Connection) -> Result<()> {
    let projects = db::query_projects(conn)?;
    if projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }
    view::projects_table(&projects).printstd();
    Ok(())
}

fn handle_project_rename(name: &str, new_name: &str, conn: &Connection) -> Result<()> {
    let id = resolve_project_id(name, conn)?;
    db::rename_project(&id, new_name, conn)
}

fn handle_project_move(name: &str, parent: Option<String>, conn: &Connection) -> Result<()> {
    let id = resolve_project_id(name, conn)?;
    let parent = match parent {
        Some(parent) => Some(resolve_project_id(&parent, conn)?),
        None => None,
    };
    db::set_project_parent(&id, parent.as_deref(), conn)
}

fn handle_project_remove(name: &str, conn: &Connection) -> Result<()> {
    let id = resolve_project_id(name, conn)?;
    db::delete_project(&id, conn)
}

fn handle_entry_add(
    start: ClockTime,
    end: ClockTime,
    date: Option<NaiveDate>,
    project: Option<String>,
    notes: Option<String>,
    conn: &Connection,
) -> Result<()> {
    if end < start {
        println!("End time {end} is before start time {start}, the entry will count as 00:00.");
    }
    let project = match project {
        Some(project) => Some(resolve_project_id(&project, conn)?),
        None => None,
    };
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let entry = TimeEntry::new(project, date, start, end, notes.unwrap_or_default());
    db::create_entry(&entry, conn)?;
    println!("Added entry {}", entry.id);
    Ok(())
}

fn handle_entry_list(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    project: Option<String>,
    conn: &Connection,
) -> Result<()> {
    let mut entries = match (from, to) {
        (Some(from), Some(to)) => db::query_entries(EntryQuery::ByDateRange(from, to), conn)?,
        (from, to) => {
            let range = DateRange::new(from.unwrap_or(NaiveDate::MIN), to.unwrap_or(NaiveDate::MAX));
            let mut entries = db::query_entries(EntryQuery::All, conn)?;
            entries.retain(|entry| range.contains(entry.date));
            entries
        }
    };
    if let Some(project) = project {
        let id = resolve_project_id(&project, conn)?;
        entries.retain(|entry| entry.project.as_deref() == Some(id.as_str()));
    }
    if entries.is_empty() {
        println!("No entries found.");
        return Ok(());
    }
    let projects = db::query_projects(conn)?;
    let settings = db::load_settings(conn)?;
    view::entries_table(&entries, &projects, &settings).printstd();
    Ok(())
}

fn handle_entry_edit(
    id: &str,
    start: Option<ClockTime>,
    end: Option<ClockTime>,
    date: Option<NaiveDate>,
    project: Option<Option<String>>,
    notes: Option<String>,
    conn: &Connection,
) -> Result<()> {
    let mut entry = db::query_entry_by_id(id, conn)?.ok_or_else(|| anyhow!("Entry '{id}' not found"))?;
    if let Some(start) = start {
        entry.start = start;
    }
    if let Some(end) = end {
        entry.end = end;
    }
    if let Some(date) = date {
        entry.date = date;
    }
    if let Some(notes) = notes {
        entry.notes = notes;
    }
    match project {
        Some(Some(project)) => entry.project = Some(resolve_project_id(&project, conn)?),
        Some(None) => entry.project = None,
        None => {}
    }
    db::update_entry(&entry, conn)
}

fn handle_entry_remove(id: &str, conn: &Connection) -> Result<()> {
    if !db::delete_entry(id, conn)? {
        println!("Entry '{id}' not found.");
    }
    Ok(())
}

/// Date range and row filters a report invocation resolves to.
#[derive(Debug, PartialEq, Eq)]
pub struct ReportSelection {
    pub range: DateRange,
    pub filters: Option<Vec<Option<ProjectId>>>,
}

pub fn resolve_report_selection(
    args: &ReportArgs,
    saved: Option<&SavedReport>,
    projects: &[Project],
    today: NaiveDate,
) -> Result<ReportSelection> {
    let base = match (saved, args.range) {
        (_, Some(preset)) => preset.range(today),
        (Some(saved), None) => DateRange::new(saved.from, saved.to),
        (None, None) => RangePreset::Week.range(today),
    };
    let range = DateRange::new(args.from.unwrap_or(base.from), args.to.unwrap_or(base.to));
    if range.to < range.from {
        bail!("Report range ends ({}) before it starts ({})", range.to, range.from);
    }

    let filters = if args.projects.is_empty() && !args.no_project {
        saved.map(|saved| saved.filters.clone())
    } else {
        let mut filters = Vec::new();
        if args.no_project {
            filters.push(None);
        }
        for name in &args.projects {
            filters.push(Some(resolve_project(name, projects)?.id.clone()));
        }
        Some(filters)
    };
    Ok(ReportSelection { range, filters })
}

fn handle_report(args: ReportArgs, conn: &Connection) -> Result<()> {
    let projects = db::query_projects(conn)?;
    let saved = match &args.load {
        Some(name) => Some(
            db::query_report_by_name(name, conn)?
                .ok_or_else(|| anyhow!("Saved report '{name}' not found"))?,
        ),
        None => None,
    };
    let today = Local::now().date_naive();
    let selection = resolve_report_selection(&args, saved.as_ref(), &projects, today)?;
    let settings = db::load_settings(conn)?;
    let entries = db::query_entries(
        EntryQuery::ByDateRange(selection.range.from, selection.range.to),
        conn,
    )?;
    let report = build_report(
        &projects,
        &entries,
        selection.range,
        &settings,
        selection.filters.as_deref(),
    );

    println!("Report for {}", report.range);
    view::report_table(&report).printstd();

    if args.detailed {
        for row in report.rows.iter().filter(|row| !row.entries.is_empty()) {
            println!();
            println!("{}", tree_display_name(&row.node));
            view::entries_table(&row.entries, &projects, &settings).printstd();
        }
    }

    if let Some(name) = args.save {
        let filters = selection.filters.unwrap_or_else(|| {
            std::iter::once(None)
                .chain(projects.iter().map(|p| Some(p.id.clone())))
                .collect()
        });
        let report = SavedReport {
            id: crate::id::new_id(),
            name,
            from: selection.range.from,
            to: selection.range.to,
            filters,
        };
        db::save_report(&report, conn)?;
        println!("Saved report '{}'", report.name);
    }
    Ok(())
}

fn handle_settings_show(conn: &Connection) -> Result<()> {
    let settings = db::load_settings(conn)?;
    println!("rounding:  {}", settings.rounding);
    println!("amount:    {} min", settings.round_amount);
    println!("round on:  {}", settings.rounding_on);
    println!("notes:     {}", settings.enable_notes);
    println!("projects:  {}", settings.enable_projects);
    Ok(())
}

fn handle_settings_set(
    rounding: Option<Rounding>,
    amount: Option<u32>,
    on: Option<RoundingOn>,
    notes: Option<bool>,
    projects: Option<bool>,
    conn: &Connection,
) -> Result<()> {
    let mut settings = db::load_settings(conn)?;
    if let Some(rounding) = rounding {
        settings.rounding = rounding;
    }
    if let Some(amount) = amount {
        settings.round_amount = check_round_amount(amount)?;
    }
    if let Some(on) = on {
        settings.rounding_on = on;
    }
    if let Some(notes) = notes {
        settings.enable_notes = notes;
    }
    if let Some(projects) = projects {
        settings.enable_projects = projects;
    }
    db::save_settings(&settings, conn)?;
    handle_settings_show(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str, parent: Option<&str>) -> Project {
        Project {
            id: id.into(),
            name: name.into(),
            parent: parent.map(str::to_string),
            created_at: Local::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_entry_add() {
        let cli = Cli::try_parse_from([
            "thyme", "entry", "add", "-s", "09:00", "-e", "10:30", "-p", "Acme",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Entry {
                command: EntryCommand::Add { start, end, project, .. },
            }) => {
                assert_eq!(start.to_string(), "09:00");
                assert_eq!(end.to_string(), "10:30");
                assert_eq!(project.as_deref(), Some("Acme"));
            }
            _ => panic!("expected entry add"),
        }
    }

    #[test]
    fn rejects_malformed_clock() {
        assert!(Cli::try_parse_from(["thyme", "entry", "add", "-s", "9h", "-e", "10:00"]).is_err());
    }

    #[test]
    fn report_accepts_flags_or_subcommand() {
        let cli = Cli::try_parse_from(["thyme", "report", "--range", "month", "--detailed"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Report { command: None, ref args }) if args.detailed && args.range == Some(RangePreset::Month)
        ));
        let cli = Cli::try_parse_from(["thyme", "report", "saved"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Report { command: Some(ReportCommand::Saved), .. })
        ));
    }

    #[test]
    fn resolves_by_name_then_path() {
        let projects = vec![
            project("a", "Acme", None),
            project("b", "Blog", None),
            project("aw", "Web", Some("a")),
            project("bw", "Web", Some("b")),
        ];
        assert_eq!(resolve_project("Acme", &projects).unwrap().id, "a");
        assert_eq!(resolve_project("Blog > Web", &projects).unwrap().id, "bw");
        assert_eq!(resolve_project("aw", &projects).unwrap().id, "aw");
        assert!(resolve_project("Web", &projects).is_err());
        assert!(resolve_project("Nope", &projects).is_err());
    }

    #[test]
    fn report_selection_defaults_to_current_week() {
        let selection =
            resolve_report_selection(&ReportArgs::default(), None, &[], date(2024, 3, 13)).unwrap();
        assert_eq!(selection.range, DateRange::new(date(2024, 3, 11), date(2024, 3, 17)));
        assert_eq!(selection.filters, None);
    }

    #[test]
    fn report_selection_uses_saved_report_and_overrides() {
        let projects = vec![project("a", "Acme", None)];
        let saved = SavedReport {
            id: "r".into(),
            name: "jan".into(),
            from: date(2024, 1, 1),
            to: date(2024, 1, 31),
            filters: vec![None],
        };
        let args = ReportArgs {
            to: Some(date(2024, 1, 15)),
            ..ReportArgs::default()
        };
        let selection = resolve_report_selection(&args, Some(&saved), &projects, date(2024, 3, 13)).unwrap();
        assert_eq!(selection.range, DateRange::new(date(2024, 1, 1), date(2024, 1, 15)));
        assert_eq!(selection.filters, Some(vec![None]));

        let args = ReportArgs {
            projects: vec!["Acme".into()],
            no_project: true,
            ..ReportArgs::default()
        };
        let selection = resolve_report_selection(&args, Some(&saved), &projects, date(2024, 3, 13)).unwrap();
        assert_eq!(selection.filters, Some(vec![None, Some("a".to_string())]));
    }

    #[test]
    fn report_selection_rejects_inverted_range() {
        let args = ReportArgs {
            from: Some(date(2024, 2, 1)),
            to: Some(date(2024, 1, 1)),
            ..ReportArgs::default()
        };
        assert!(resolve_report_selection(&args, None, &[], date(2024, 3, 13)).is_err());
    }
}
