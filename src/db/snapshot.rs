//! Whole-database JSON snapshots for backup and transfer.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use super::{date_param, load_settings, query_entries, query_projects, query_reports};
use crate::core::tree::is_descendant;
use crate::settings::Settings;
use crate::types::{EntryQuery, Project, SavedReport, TimeEntry};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub entries: Vec<TimeEntry>,
    #[serde(default)]
    pub reports: Vec<SavedReport>,
    #[serde(default)]
    pub settings: Settings,
}

pub fn export_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        projects: query_projects(conn)?,
        entries: query_entries(EntryQuery::All, conn)?,
        reports: query_reports(conn)?,
        settings: load_settings(conn)?,
    })
}

/// Replaces all stored data with `snapshot`. Nothing is written if the snapshot's
/// project tree contains a cycle or its settings are out of range.
pub fn import_snapshot(snapshot: &Snapshot, conn: &Connection) -> Result<()> {
    snapshot.settings.validate()?;
    if let Some(looped) = snapshot
        .projects
        .iter()
        .find(|p| is_descendant(Some(p.id.as_str()), &p.id, &snapshot.projects))
    {
        bail!("project '{}' is its own ancestor", looped.name);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "DELETE FROM entries; DELETE FROM projects; DELETE FROM reports; DELETE FROM settings;",
    )?;
    for project in &snapshot.projects {
        tx.execute(
            "INSERT INTO projects (id, name, parent, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                project.id,
                project.name,
                project.parent,
                project.created_at.to_rfc3339()
            ],
        )?;
    }
    for entry in &snapshot.entries {
        tx.execute(
            "INSERT INTO entries (id, project, date, start_time, end_time, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id,
                entry.project,
                date_param(entry.date),
                entry.start.to_string(),
                entry.end.to_string(),
                entry.notes,
            ],
        )?;
    }
    for report in &snapshot.reports {
        tx.execute(
            "INSERT INTO reports (id, name, date_from, date_to, filters) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                report.id,
                report.name,
                date_param(report.from),
                date_param(report.to),
                serde_json::to_string(&report.filters)?,
            ],
        )?;
    }
    tx.execute(
        "INSERT INTO settings (key, value) VALUES ('preferences', ?1)",
        [serde_json::to_string(&snapshot.settings)?],
    )?;
    tx.commit()?;
    tracing::info!(
        projects = snapshot.projects.len(),
        entries = snapshot.entries.len(),
        reports = snapshot.reports.len(),
        "snapshot imported"
    );
    Ok(())
}

pub fn write_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), snapshot)?;
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let snapshot = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(snapshot)
}
