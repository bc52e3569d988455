//! Time entry database queries.

use anyhow::{Result, anyhow};
use rusqlite::{Connection, Row, params};

use super::{clock_column, date_column, date_param};
use crate::types::{EntryQuery, TimeEntry};

const ENTRY_COLUMNS: &str = "id, project, date, start_time, end_time, notes";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get(0)?,
        project: row.get(1)?,
        date: date_column(row, 2)?,
        start: clock_column(row, 3)?,
        end: clock_column(row, 4)?,
        notes: row.get(5)?,
    })
}

pub fn create_entry(entry: &TimeEntry, conn: &Connection) -> Result<()> {
    conn.execute(
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
    tracing::debug!(id = %entry.id, date = %entry.date, "entry created");
    Ok(())
}

pub fn query_entries(query: EntryQuery, conn: &Connection) -> Result<Vec<TimeEntry>> {
    let order = "ORDER BY date, start_time";
    let mut stmt;
    let rows = match &query {
        EntryQuery::All => {
            stmt = conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries {order}"))?;
            stmt.query_map([], entry_from_row)?
        }
        EntryQuery::ByProject(Some(project)) => {
            stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE project = ?1 {order}"
            ))?;
            stmt.query_map([project], entry_from_row)?
        }
        EntryQuery::ByProject(None) => {
            stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE project IS NULL {order}"
            ))?;
            stmt.query_map([], entry_from_row)?
        }
        EntryQuery::ByDateRange(from, to) => {
            stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM entries WHERE date >= ?1 AND date <= ?2 {order}"
            ))?;
            stmt.query_map([date_param(*from), date_param(*to)], entry_from_row)?
        }
    };
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub fn query_entry_by_id(id: &str, conn: &Connection) -> Result<Option<TimeEntry>> {
    let mut stmt = conn.prepare(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(entry_from_row(row)?))
    } else {
        Ok(None)
    }
}

pub fn update_entry(entry: &TimeEntry, conn: &Connection) -> Result<()> {
    let changed = conn.execute(
        "UPDATE entries SET project = ?1, date = ?2, start_time = ?3, end_time = ?4, notes = ?5
         WHERE id = ?6",
        params![
            entry.project,
            date_param(entry.date),
            entry.start.to_string(),
            entry.end.to_string(),
            entry.notes,
            entry.id,
        ],
    )?;
    if changed == 0 {
        return Err(anyhow!("entry '{}' not found", entry.id));
    }
    Ok(())
}

pub fn delete_entry(id: &str, conn: &Connection) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;
    use chrono::NaiveDate;

    fn entry(project: Option<&str>, day: u32, start: &str, end: &str) -> TimeEntry {
        TimeEntry::new(
            project.map(str::to_string),
            NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            start.parse().unwrap(),
            end.parse().unwrap(),
            "notes",
        )
    }

    #[test]
    fn queries_by_project_and_range() {
        let conn = init_in_memory().unwrap();
        for e in [
            entry(Some("p"), 3, "09:00", "10:00"),
            entry(None, 1, "11:00", "12:00"),
            entry(Some("p"), 1, "08:00", "09:00"),
        ] {
            create_entry(&e, &conn).unwrap();
        }

        let all = query_entries(EntryQuery::All, &conn).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].start.to_string(), "08:00");

        let on_p = query_entries(EntryQuery::ByProject(Some("p".into())), &conn).unwrap();
        assert_eq!(on_p.len(), 2);
        let unassigned = query_entries(EntryQuery::ByProject(None), &conn).unwrap();
        assert_eq!(unassigned.len(), 1);

        let first_two_days = query_entries(
            EntryQuery::ByDateRange(
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            ),
            &conn,
        )
        .unwrap();
        assert_eq!(first_two_days.len(), 2);
    }

    #[test]
    fn updates_and_deletes() {
        let conn = init_in_memory().unwrap();
        let mut e = entry(None, 1, "09:00", "10:00");
        create_entry(&e, &conn).unwrap();

        e.end = "11:15".parse().unwrap();
        e.notes = "longer".into();
        update_entry(&e, &conn).unwrap();
        let stored = query_entry_by_id(&e.id, &conn).unwrap().unwrap();
        assert_eq!(stored, e);

        assert!(delete_entry(&e.id, &conn).unwrap());
        assert!(!delete_entry(&e.id, &conn).unwrap());
        assert!(query_entry_by_id(&e.id, &conn).unwrap().is_none());
    }
}
