//! Persisted user settings.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::settings::Settings;

const SETTINGS_KEY: &str = "preferences";

/// Loads settings, falling back to defaults when none were saved.
pub fn load_settings(conn: &Connection) -> Result<Settings> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [SETTINGS_KEY],
            |row| row.get(0),
        )
        .optional()?;
    match raw {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Settings::default()),
    }
}

pub fn save_settings(settings: &Settings, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        (SETTINGS_KEY, serde_json::to_string(settings)?),
    )?;
    tracing::debug!(?settings, "settings saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_in_memory;
    use crate::settings::{Rounding, RoundingOn};

    #[test]
    fn defaults_when_empty() {
        let conn = init_in_memory().unwrap();
        assert_eq!(load_settings(&conn).unwrap(), Settings::default());
    }

    #[test]
    fn round_trips_saved_settings() {
        let conn = init_in_memory().unwrap();
        let settings = Settings {
            rounding: Rounding::Round,
            round_amount: 6,
            rounding_on: RoundingOn::Reports,
            enable_notes: false,
            enable_projects: true,
        };
        save_settings(&settings, &conn).unwrap();
        assert_eq!(load_settings(&conn).unwrap(), settings);
    }
}
