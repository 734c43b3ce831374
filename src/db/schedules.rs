//! Schedule store: append-only uploads, "current" = newest by upload time.

use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Schedule, ScheduleEntry};
use crate::utils::time::{format_time, parse_time};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

fn conversion_error(col: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

/// Timestamps are stored in a fixed-width UTC form so text order is time order.
pub(crate) fn utc_key(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_utc(raw: &str, col: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_error(col, AppError::InvalidTimestamp(raw.to_string())))
}

fn map_entry(row: &Row) -> rusqlite::Result<ScheduleEntry> {
    let date_str: String = row.get("date")?;
    let start_str: String = row.get("start_time")?;
    let end_str: String = row.get("end_time")?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(date_str.clone())))?;
    let start =
        parse_time(&start_str).ok_or_else(|| conversion_error(1, AppError::InvalidTime(start_str)))?;
    let end = parse_time(&end_str).ok_or_else(|| conversion_error(2, AppError::InvalidTime(end_str)))?;

    Ok(ScheduleEntry { date, start, end })
}

pub fn insert_schedule(conn: &Connection, schedule: &Schedule) -> AppResult<()> {
    conn.execute(
        "INSERT INTO schedules (id, source_name, uploaded_at) VALUES (?1, ?2, ?3)",
        params![
            schedule.id,
            schedule.source_name,
            utc_key(&schedule.uploaded_at)
        ],
    )?;

    let mut stmt = conn.prepare_cached(
        "INSERT INTO schedule_entries (schedule_id, position, date, start_time, end_time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for (pos, e) in schedule.entries.iter().enumerate() {
        stmt.execute(params![
            schedule.id,
            pos as i64,
            e.date.format("%Y-%m-%d").to_string(),
            format_time(e.start),
            format_time(e.end),
        ])?;
    }

    Ok(())
}

fn load_entries(conn: &Connection, schedule_id: &str) -> AppResult<Vec<ScheduleEntry>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, start_time, end_time FROM schedule_entries
         WHERE schedule_id = ?1
         ORDER BY position ASC",
    )?;

    let rows = stmt.query_map([schedule_id], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Most recently uploaded schedule; ties on `uploaded_at` go to the later insert.
pub fn load_current(conn: &Connection) -> AppResult<Option<Schedule>> {
    let head = conn
        .query_row(
            "SELECT id, source_name, uploaded_at FROM schedules
             ORDER BY uploaded_at DESC, rowid DESC
             LIMIT 1",
            [],
            |row| {
                let uploaded: String = row.get(2)?;
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    parse_utc(&uploaded, 2)?,
                ))
            },
        )
        .optional()?;

    let Some((id, source_name, uploaded_at)) = head else {
        return Ok(None);
    };

    let entries = load_entries(conn, &id)?;

    Ok(Some(Schedule {
        id,
        entries,
        uploaded_at,
        source_name,
    }))
}

/// Delete a schedule and its entries. Returns false when the id is unknown.
pub fn delete_schedule(conn: &Connection, id: &str) -> AppResult<bool> {
    conn.execute("DELETE FROM schedule_entries WHERE schedule_id = ?1", [id])?;
    let n = conn.execute("DELETE FROM schedules WHERE id = ?1", [id])?;
    Ok(n > 0)
}
