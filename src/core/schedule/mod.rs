//! Schedule ingestion: upload decoding, table parsing and the schedule store.

pub mod columns;
pub mod lines;
pub mod reader;
pub mod rollover;
pub mod table;

use crate::core::context::AppContext;
use crate::db::log::ttlog;
use crate::db::schedules::{delete_schedule, insert_schedule, load_current};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::{Schedule, ScheduleEntry};
use crate::utils::date::current_year_month;
use reader::UploadContent;

pub use columns::ColumnRoles;
pub use reader::read_upload;
pub use rollover::{DecreasingDayRollover, MonthRollover};
pub use table::{RawTable, parse_table};

/// Optional year/month an upload of bare day numbers starts in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceMonth {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl ReferenceMonth {
    /// Fill missing parts from the current month.
    fn resolve(self) -> AppResult<(i32, u32)> {
        let (cy, cm) = current_year_month();
        let month = self.month.unwrap_or(cm);
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("month must be 1-12, got {month}")));
        }
        Ok((self.year.unwrap_or(cy), month))
    }
}

pub struct ScheduleLogic;

impl ScheduleLogic {
    /// Parse a base64 file upload and store it as the new current schedule.
    pub fn upload_file(
        ctx: &AppContext,
        content_b64: &str,
        filename: &str,
        reference: ReferenceMonth,
    ) -> AppResult<Schedule> {
        let content = read_upload(content_b64, filename)?;
        Self::store_content(ctx, content, filename, reference)
    }

    /// Same as [`upload_file`](Self::upload_file) for raw bytes read from disk.
    pub fn upload_bytes(
        ctx: &AppContext,
        bytes: Vec<u8>,
        filename: &str,
        reference: ReferenceMonth,
    ) -> AppResult<Schedule> {
        let content = reader::read_bytes(bytes, &reader::extension(filename))?;
        Self::store_content(ctx, content, filename, reference)
    }

    fn store_content(
        ctx: &AppContext,
        content: UploadContent,
        filename: &str,
        reference: ReferenceMonth,
    ) -> AppResult<Schedule> {
        let entries = match content {
            UploadContent::Table(t) => parse_table(&t, Some(reference.resolve()?))?,
            UploadContent::Lines(text) => lines::parse_lines(&text),
        };

        if entries.is_empty() {
            return Err(AppError::Validation(
                "No valid schedule data found in file".to_string(),
            ));
        }

        Self::store(ctx, entries, filename)
    }

    /// Store manually entered days.
    pub fn upload_manual(ctx: &AppContext, entries: Vec<ScheduleEntry>) -> AppResult<Schedule> {
        if entries.is_empty() {
            return Err(AppError::Validation("No work days provided".to_string()));
        }
        Self::store(ctx, entries, "manual")
    }

    fn store(ctx: &AppContext, entries: Vec<ScheduleEntry>, source: &str) -> AppResult<Schedule> {
        let schedule = Schedule::new(entries, source, ctx.now_utc());

        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            insert_schedule(&tx, &schedule)?;
            ttlog(
                &tx,
                "upload",
                &schedule.id,
                &format!("{} day(s) from {}", schedule.entries.len(), source),
            )?;
            tx.commit()?;
            Ok(())
        })?;

        log::info!(
            "schedule {} stored with {} entries",
            schedule.id,
            schedule.entries.len()
        );
        Ok(schedule)
    }

    /// Most recently uploaded schedule, if any.
    pub fn current(ctx: &AppContext) -> AppResult<Option<Schedule>> {
        ctx.with_db(|pool| load_current(&pool.conn))
    }

    pub fn delete(ctx: &AppContext, id: &str) -> AppResult<()> {
        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            if !delete_schedule(&tx, id)? {
                return Err(AppError::ScheduleNotFound(id.to_string()));
            }
            ttlog(&tx, "delete", id, "schedule deleted")?;
            tx.commit()?;
            Ok(())
        })
    }
}
