//! Work session lifecycle: start, end, edit, photos, lookups.

use crate::core::calculator::overtime::{overtime_at_end, overtime_by_duration};
use crate::core::context::AppContext;
use crate::db::log::ttlog;
use crate::db::schedules::load_current;
use crate::db::sessions::{
    append_photo, insert_session, load_active, load_history, load_session, session_exists,
    update_session,
};
use crate::errors::{AppError, AppResult};
use crate::models::session::{GeoPoint, WorkSession};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rusqlite::Connection;

pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Fields an edit may overwrite. `end = None` leaves the end time and the
/// overtime as they are.
#[derive(Debug, Clone)]
pub struct SessionEdit {
    pub start: DateTime<FixedOffset>,
    pub end: Option<DateTime<FixedOffset>>,
    pub date: NaiveDate,
}

fn require(conn: &Connection, id: &str) -> AppResult<WorkSession> {
    load_session(conn, id)?.ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}

pub struct SessionLogic;

impl SessionLogic {
    /// Open a session, copying the scheduled times for `date` from the current schedule.
    pub fn start(
        ctx: &AppContext,
        date: NaiveDate,
        start_time: DateTime<FixedOffset>,
        location: Option<GeoPoint>,
    ) -> AppResult<WorkSession> {
        let created_at = ctx.now_utc();

        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;

            if let Some(active) = load_active(&tx)? {
                log::warn!(
                    "session {} (started {}) is still active; starting another one",
                    active.id,
                    active.start_time
                );
            }

            let schedule = load_current(&tx)?;
            let entry = schedule.as_ref().and_then(|s| s.entry_for(date));
            let session = WorkSession::new(date, start_time, entry, location, created_at);

            insert_session(&tx, &session)?;
            ttlog(
                &tx,
                "start",
                &session.id,
                &format!(
                    "{} at {} (scheduled {})",
                    date,
                    start_time.format("%H:%M"),
                    match entry {
                        Some(e) => format!("{}-{}", e.start.format("%H:%M"), e.end.format("%H:%M")),
                        None => "none".to_string(),
                    }
                ),
            )?;
            tx.commit()?;
            Ok(session)
        })
    }

    /// Close a session now and compute overtime against the scheduled end.
    pub fn end(ctx: &AppContext, id: &str, location: Option<GeoPoint>) -> AppResult<WorkSession> {
        let end = ctx.now();
        let policy = *ctx.policy();

        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            let mut session = require(&tx, id)?;

            if !session.is_active() {
                log::warn!("session {id} was already ended; recomputing with a new end time");
            }

            session.end_time = Some(end);
            session.overtime_minutes = Some(overtime_at_end(end, session.scheduled_end, &policy));
            if location.is_some() {
                session.end_location = location;
            }

            update_session(&tx, &session)?;
            ttlog(
                &tx,
                "end",
                id,
                &format!(
                    "ended at {}, overtime {} min",
                    end.format("%Y-%m-%d %H:%M"),
                    session.overtime_minutes.unwrap_or(0)
                ),
            )?;
            tx.commit()?;
            Ok(session)
        })
    }

    /// Overwrite start/date (and optionally end), recomputing overtime as
    /// actual duration minus scheduled duration.
    pub fn edit(ctx: &AppContext, id: &str, edit: SessionEdit) -> AppResult<WorkSession> {
        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            let mut session = require(&tx, id)?;

            session.start_time = edit.start;
            session.date = edit.date;

            if let Some(end) = edit.end {
                session.end_time = Some(end);
                session.overtime_minutes = Some(match (session.scheduled_start, session.scheduled_end) {
                    (Some(ss), Some(se)) => overtime_by_duration(edit.start, end, ss, se),
                    _ => 0,
                });
            }

            update_session(&tx, &session)?;
            ttlog(
                &tx,
                "edit",
                id,
                &format!(
                    "{} {}-{}",
                    session.date,
                    session.start_time.format("%H:%M"),
                    session
                        .end_time
                        .map(|t| t.format("%H:%M").to_string())
                        .unwrap_or_else(|| "--:--".to_string())
                ),
            )?;
            tx.commit()?;
            Ok(session)
        })
    }

    /// Append a base64 photo; returns the new photo count.
    pub fn add_photo(ctx: &AppContext, id: &str, photo_b64: &str) -> AppResult<usize> {
        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            if !session_exists(&tx, id)? {
                return Err(AppError::SessionNotFound(id.to_string()));
            }

            let count = append_photo(&tx, id, photo_b64)?;
            ttlog(&tx, "photo", id, &format!("photo #{count} added"))?;
            tx.commit()?;
            Ok(count)
        })
    }

    pub fn get(ctx: &AppContext, id: &str) -> AppResult<WorkSession> {
        ctx.with_db(|pool| require(&pool.conn, id))
    }

    /// Most recently started session still open.
    pub fn active(ctx: &AppContext) -> AppResult<Option<WorkSession>> {
        ctx.with_db(|pool| load_active(&pool.conn))
    }

    pub fn history(ctx: &AppContext, limit: usize) -> AppResult<Vec<WorkSession>> {
        ctx.with_db(|pool| load_history(&pool.conn, limit))
    }
}
