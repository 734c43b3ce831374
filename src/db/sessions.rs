//! Work session persistence. Photos live in `session_photos`, ordered by position.

use crate::db::schedules::{parse_utc, utc_key};
use crate::errors::{AppError, AppResult};
use crate::models::session::{GeoPoint, WorkSession};
use crate::utils::time::{format_time, parse_time};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

const SESSION_COLUMNS: &str = "id, date, start_time, end_time, scheduled_start, scheduled_end,
     overtime_minutes, email_sent, start_lat, start_lon, end_lat, end_lon, created_at";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_aware(raw: &str) -> rusqlite::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|_| conversion_error(AppError::InvalidTimestamp(raw.to_string())))
}

fn parse_opt_time(raw: Option<String>) -> rusqlite::Result<Option<chrono::NaiveTime>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_time(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(AppError::InvalidTime(s))),
    }
}

fn geo(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    }
}

/// Map a `work_sessions` row; photos are loaded separately.
fn map_row(row: &Row) -> rusqlite::Result<WorkSession> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;

    let start_raw: String = row.get("start_time")?;
    let end_raw: Option<String> = row.get("end_time")?;
    let created_raw: String = row.get("created_at")?;

    Ok(WorkSession {
        id: row.get("id")?,
        date,
        start_time: parse_aware(&start_raw)?,
        end_time: end_raw.as_deref().map(parse_aware).transpose()?,
        photos: Vec::new(),
        scheduled_start: parse_opt_time(row.get("scheduled_start")?)?,
        scheduled_end: parse_opt_time(row.get("scheduled_end")?)?,
        overtime_minutes: row.get("overtime_minutes")?,
        email_sent: row.get::<_, i32>("email_sent")? == 1,
        start_location: geo(row.get("start_lat")?, row.get("start_lon")?),
        end_location: geo(row.get("end_lat")?, row.get("end_lon")?),
        created_at: parse_utc(&created_raw, 0)?,
    })
}

fn load_photos(conn: &Connection, session_id: &str) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT data FROM session_photos WHERE session_id = ?1 ORDER BY position ASC",
    )?;
    let rows = stmt.query_map([session_id], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn with_photos(conn: &Connection, mut sessions: Vec<WorkSession>) -> AppResult<Vec<WorkSession>> {
    for s in sessions.iter_mut() {
        s.photos = load_photos(conn, &s.id)?;
    }
    Ok(sessions)
}

fn query_sessions(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<WorkSession>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    with_photos(conn, out)
}

pub fn insert_session(conn: &Connection, s: &WorkSession) -> AppResult<()> {
    conn.execute(
        "INSERT INTO work_sessions (id, date, start_time, start_utc, end_time, scheduled_start,
            scheduled_end, overtime_minutes, email_sent, start_lat, start_lon, end_lat, end_lon,
            created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            s.id,
            s.date.format("%Y-%m-%d").to_string(),
            s.start_time.to_rfc3339(),
            utc_key(&s.start_time.with_timezone(&Utc)),
            s.end_time.map(|t| t.to_rfc3339()),
            s.scheduled_start.map(format_time),
            s.scheduled_end.map(format_time),
            s.overtime_minutes,
            if s.email_sent { 1 } else { 0 },
            s.start_location.map(|g| g.latitude),
            s.start_location.map(|g| g.longitude),
            s.end_location.map(|g| g.latitude),
            s.end_location.map(|g| g.longitude),
            utc_key(&s.created_at),
        ],
    )?;

    for (pos, photo) in s.photos.iter().enumerate() {
        conn.execute(
            "INSERT INTO session_photos (session_id, position, data) VALUES (?1, ?2, ?3)",
            params![s.id, pos as i64, photo],
        )?;
    }
    Ok(())
}

/// Persist the mutable columns of a session (times, date, overtime, end location).
pub fn update_session(conn: &Connection, s: &WorkSession) -> AppResult<()> {
    conn.execute(
        "UPDATE work_sessions
            SET date = ?2, start_time = ?3, start_utc = ?4, end_time = ?5,
                overtime_minutes = ?6, end_lat = ?7, end_lon = ?8
          WHERE id = ?1",
        params![
            s.id,
            s.date.format("%Y-%m-%d").to_string(),
            s.start_time.to_rfc3339(),
            utc_key(&s.start_time.with_timezone(&Utc)),
            s.end_time.map(|t| t.to_rfc3339()),
            s.overtime_minutes,
            s.end_location.map(|g| g.latitude),
            s.end_location.map(|g| g.longitude),
        ],
    )?;
    Ok(())
}

pub fn load_session(conn: &Connection, id: &str) -> AppResult<Option<WorkSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM work_sessions WHERE id = ?1");
    let session = conn.query_row(&sql, [id], map_row).optional()?;

    match session {
        Some(mut s) => {
            s.photos = load_photos(conn, &s.id)?;
            Ok(Some(s))
        }
        None => Ok(None),
    }
}

pub fn session_exists(conn: &Connection, id: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM work_sessions WHERE id = ?1")?;
    Ok(stmt.exists([id])?)
}

/// Append a photo and return the new photo count.
pub fn append_photo(conn: &Connection, session_id: &str, photo: &str) -> AppResult<usize> {
    let next: i64 = conn.query_row(
        "SELECT COUNT(*) FROM session_photos WHERE session_id = ?1",
        [session_id],
        |row| row.get(0),
    )?;

    conn.execute(
        "INSERT INTO session_photos (session_id, position, data) VALUES (?1, ?2, ?3)",
        params![session_id, next, photo],
    )?;

    Ok(next as usize + 1)
}

/// Most recently started session without an end time.
pub fn load_active(conn: &Connection) -> AppResult<Option<WorkSession>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM work_sessions
         WHERE end_time IS NULL
         ORDER BY start_utc DESC, rowid DESC
         LIMIT 1"
    );
    Ok(query_sessions(conn, &sql, [])?.into_iter().next())
}

pub fn load_history(conn: &Connection, limit: usize) -> AppResult<Vec<WorkSession>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM work_sessions
         ORDER BY start_utc DESC, rowid DESC
         LIMIT ?1"
    );
    query_sessions(conn, &sql, [limit as i64])
}

/// Sessions whose date falls in the inclusive range (all when `None`), oldest first.
pub fn load_in_range(
    conn: &Connection,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<WorkSession>> {
    match bounds {
        Some((from, to)) => {
            let sql = format!(
                "SELECT {SESSION_COLUMNS} FROM work_sessions
                 WHERE date BETWEEN ?1 AND ?2
                 ORDER BY start_utc ASC"
            );
            query_sessions(
                conn,
                &sql,
                params![
                    from.format("%Y-%m-%d").to_string(),
                    to.format("%Y-%m-%d").to_string()
                ],
            )
        }
        None => {
            let sql = format!("SELECT {SESSION_COLUMNS} FROM work_sessions ORDER BY start_utc ASC");
            query_sessions(conn, &sql, [])
        }
    }
}

/// Idempotent: flags the session as reported. Returns false for unknown ids.
pub fn mark_email_sent(conn: &Connection, id: &str) -> AppResult<bool> {
    let n = conn.execute("UPDATE work_sessions SET email_sent = 1 WHERE id = ?1", [id])?;
    Ok(n > 0)
}
