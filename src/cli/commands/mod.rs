//! One handler per subcommand. Each opens its own context from the config.

pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod schedule;
pub mod send;
pub mod serve;
pub mod session;
pub mod settings;

use crate::config::Config;
use crate::core::context::AppContext;
use crate::errors::{AppError, AppResult};
use crate::models::session::{GeoPoint, WorkSession};
use crate::utils::formatting::{mins2readable, or_dash};
use crate::utils::table::Table;
use crate::utils::time::format_time;
use std::path::Path;

pub(crate) fn open_context(cfg: &Config) -> AppResult<AppContext> {
    if !Path::new(&cfg.database).exists() {
        return Err(AppError::Config(format!(
            "database {} not found, run `rovertime init` first",
            cfg.database
        )));
    }
    AppContext::from_config(cfg)
}

pub(crate) fn geo(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
    match (lat, lon) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    }
}

/// Sessions as a table, one row each.
pub(crate) fn sessions_table(sessions: &[WorkSession]) -> Table {
    let mut table = Table::new(&[
        "ID", "DATE", "START", "END", "SCHEDULED", "OVERTIME", "PHOTOS", "SENT",
    ]);

    for s in sessions {
        let scheduled = match (s.scheduled_start, s.scheduled_end) {
            (Some(a), Some(b)) => format!("{}-{}", format_time(a), format_time(b)),
            _ => "-".to_string(),
        };

        table.add_row(vec![
            s.id.clone(),
            s.date.to_string(),
            s.start_time.format("%H:%M").to_string(),
            or_dash(s.end_time.map(|t| t.format("%H:%M").to_string())),
            scheduled,
            or_dash(s.overtime_minutes.map(|m| mins2readable(m, false, false))),
            s.photo_count().to_string(),
            if s.email_sent { "yes" } else { "no" }.to_string(),
        ]);
    }

    table
}
