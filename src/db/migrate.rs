use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A forward-only schema step, applied once and recorded in `log`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_schedules",
        description: "Created schedules and schedule_entries tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id           TEXT PRIMARY KEY,
            source_name  TEXT NOT NULL,
            uploaded_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schedule_entries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            schedule_id  TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
            position     INTEGER NOT NULL,
            date         TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_schedules_uploaded ON schedules(uploaded_at);
        CREATE INDEX IF NOT EXISTS idx_entries_schedule ON schedule_entries(schedule_id, position);
        "#,
    },
    Migration {
        version: "20250301_0002_create_work_sessions",
        description: "Created work_sessions and session_photos tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS work_sessions (
            id                TEXT PRIMARY KEY,
            date              TEXT NOT NULL,
            start_time        TEXT NOT NULL,
            start_utc         TEXT NOT NULL,
            end_time          TEXT,
            scheduled_start   TEXT,
            scheduled_end     TEXT,
            overtime_minutes  INTEGER,
            email_sent        INTEGER NOT NULL DEFAULT 0,
            start_lat         REAL,
            start_lon         REAL,
            end_lat           REAL,
            end_lon           REAL,
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session_photos (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  TEXT NOT NULL REFERENCES work_sessions(id) ON DELETE CASCADE,
            position    INTEGER NOT NULL,
            data        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_start ON work_sessions(start_utc);
        CREATE INDEX IF NOT EXISTS idx_sessions_active ON work_sessions(end_time, start_utc);
        CREATE INDEX IF NOT EXISTS idx_photos_session ON session_photos(session_id, position);
        "#,
    },
    Migration {
        version: "20250301_0003_create_settings",
        description: "Created settings table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS settings (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            data        TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    conn.execute_batch(&format!("BEGIN;\n{}\nCOMMIT;", m.sql))
        .inspect_err(|_| {
            let _ = conn.execute_batch("ROLLBACK;");
        })?;

    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    success(format!("Migration applied: {} → {}", m.version, m.description));
    Ok(())
}

/// Run all pending migrations. Called from `db::initialize::init_db`.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            apply(conn, m)?;
        }
    }

    Ok(())
}
