use crate::core::context::AppContext;
use crate::db::sessions::load_in_range;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, notify_export_success};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::SessionExport;
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export work sessions.
    ///
    /// - `format`: inferred from the extension of `file` when `None`
    /// - `file`: absolute output path
    /// - `range`: `None`, `"all"` or one of
    ///   `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYY:YYYY`, `YYYY-MM:YYYY-MM`,
    ///   `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of exported sessions (0 writes nothing).
    pub fn export(
        ctx: &AppContext,
        format: Option<ExportFormat>,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Validation(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        let format = match format {
            Some(f) => f,
            None => ExportFormat::from_path(path)?,
        };

        let bounds: Option<(NaiveDate, NaiveDate)> = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };

        let sessions = ctx.with_db(|pool| load_in_range(&pool.conn, bounds))?;

        if sessions.is_empty() {
            warning("No sessions found for the selected range.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let rows: Vec<SessionExport> = sessions.iter().map(SessionExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
            ExportFormat::Xlsx => export_xlsx(&rows, path)?,
        }

        notify_export_success(format, rows.len(), path);
        log::info!("exported {} session(s) as {}", rows.len(), format.as_str());
        Ok(rows.len())
    }
}
