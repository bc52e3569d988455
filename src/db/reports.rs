//! Saved report queries.

use anyhow::Result;
use rusqlite::{Connection, Row, params};

use super::{conversion_error, date_column, date_param};
use crate::types::{ProjectId, SavedReport};

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<SavedReport> {
    let filters: String = row.get(4)?;
    let filters: Vec<Option<ProjectId>> =
        serde_json::from_str(&filters).map_err(|err| conversion_error(4, err))?;
    Ok(SavedReport {
        id: row.get(0)?,
        name: row.get(1)?,
        from: date_column(row, 2)?,
        to: date_column(row, 3)?,
        filters,
    })
}

/// Stores `report`, replacing any saved report with the same name.
pub fn save_report(report: &SavedReport, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO reports (id, name, date_from, date_to, filters) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(name) DO UPDATE SET
            date_from = excluded.date_from,
            date_to = excluded.date_to,
            filters = excluded.filters",
        params![
            report.id,
            report.name,
            date_param(report.from),
            date_param(report.to),
            serde_json::to_string(&report.filters)?,
        ],
    )?;
    tracing::info!(name = %report.name, "report saved");
    Ok(())
}

pub fn query_reports(conn: &Connection) -> Result<Vec<SavedReport>> {
    let mut stmt =
        conn.prepare("SELECT id, name, date_from, date_to, filters FROM reports ORDER BY name")?;
    let rows = stmt.query_map([], report_from_row)?;
    let mut reports = Vec::new();
    for row in rows {
        reports.push(row?);
    }
    Ok(reports)
}

pub fn query_report_by_name(name: &str, conn: &Connection) -> Result<Option<SavedReport>> {
    let mut stmt = conn
        .prepare("SELECT id, name, date_from, date_to, filters FROM reports WHERE name = ?1")?;
    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        Ok(Some(report_from_row(row)?))
    } else {
        Ok(None)
    }
}

pub fn delete_report(name: &str, conn: &Connection) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM reports WHERE name = ?1", [name])?;
    Ok(deleted > 0)
}
