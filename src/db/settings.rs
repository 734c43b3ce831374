use crate::errors::{AppError, AppResult};
use crate::models::settings::Settings;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

/// Settings are kept as a single JSON document (row id = 1).
pub fn load_settings(conn: &Connection) -> AppResult<Option<Settings>> {
    let raw: Option<String> = conn
        .query_row("SELECT data FROM settings WHERE id = 1", [], |row| row.get(0))
        .optional()?;

    match raw {
        None => Ok(None),
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| AppError::Other(format!("corrupt settings record: {e}"))),
    }
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> AppResult<()> {
    let json = serde_json::to_string(settings)
        .map_err(|e| AppError::Other(format!("settings serialization error: {e}")))?;

    conn.execute(
        "INSERT INTO settings (id, data, updated_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        params![json, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}
