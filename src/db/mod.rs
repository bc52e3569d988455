/// Database module with project, entry, report and settings queries and migrations.
mod entries;
mod migrations;
mod project;
mod reports;
mod settings;
mod snapshot;

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rusqlite::types::Type;

use crate::types::ClockTime;

// Re-export all public functions
pub use entries::{create_entry, delete_entry, query_entries, query_entry_by_id, update_entry};
pub use project::{
    create_project, delete_project, query_project_by_id, query_projects, rename_project,
    set_project_parent,
};
pub use reports::{delete_report, query_report_by_name, query_reports, save_report};
pub use settings::{load_settings, save_settings};
pub use snapshot::{Snapshot, export_snapshot, import_snapshot, read_snapshot, write_snapshot};

pub const DB_ENV: &str = "THYME_DB";

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    tracing::debug!(path = %db_path.display(), "database ready");
    Ok(conn)
}

/// A migrated database that lives only as long as the connection.
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Directory holding the database and logs.
/// Falls back to the working directory when no data dir is found.
pub fn data_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("thyme"),
        None => PathBuf::from("."),
    }
}

/// Returns the database path: `THYME_DB` when set, else `thyme.db` in [`data_dir`].
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_ENV) {
        return PathBuf::from(path);
    }
    let dir = data_dir();
    std::fs::create_dir_all(&dir).ok();
    dir.join("thyme.db")
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

pub(crate) fn date_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(column)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|err| conversion_error(column, err))
}

pub(crate) fn clock_column(row: &rusqlite::Row<'_>, column: usize) -> rusqlite::Result<ClockTime> {
    let raw: String = row.get(column)?;
    raw.parse::<ClockTime>()
        .map_err(|err| conversion_error(column, err))
}

pub(crate) fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
