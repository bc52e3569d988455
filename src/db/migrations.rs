//! Database migrations and schema management.

use anyhow::Result;
use rusqlite::Connection;

/// Creates the schema if it doesn't exist yet and applies column upgrades.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS projects (
            id          TEXT    PRIMARY KEY,
            name        TEXT    NOT NULL,
            parent      TEXT,
            created_at  TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS entries (
            id          TEXT    PRIMARY KEY,
            project     TEXT,
            date        TEXT    NOT NULL,
            start_time  TEXT    NOT NULL,
            end_time    TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS reports (
            id          TEXT    PRIMARY KEY,
            name        TEXT    NOT NULL UNIQUE,
            date_from   TEXT    NOT NULL,
            date_to     TEXT    NOT NULL,
            filters     TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key         TEXT    PRIMARY KEY,
            value       TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS entries_date ON entries (date);
        ",
    )?;
    migrate_entries_add_notes(conn)?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        Ok(name)
    })?;
    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn migrate_entries_add_notes(conn: &Connection) -> Result<()> {
    if has_column(conn, "entries", "notes")? {
        return Ok(());
    }
    tracing::info!("adding notes column to entries");
    conn.execute(
        "ALTER TABLE entries ADD COLUMN notes TEXT NOT NULL DEFAULT ''",
        [],
    )?;
    Ok(())
}
