use crate::cli::commands::open_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule::{ReferenceMonth, ScheduleLogic};
use crate::errors::{AppError, AppResult};
use crate::models::schedule::ScheduleEntry;
use crate::ui::messages::{info, success};
use crate::utils::date::parse_date_arg;
use crate::utils::path::expand_tilde;
use crate::utils::time::parse_time_arg;
use std::fs;

/// Handle `import` (schedule file) and `manual` (entries on the command line).
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Import { file, year, month } => {
            let path = expand_tilde(file);
            let bytes = fs::read(&path)?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| file.clone());

            let ctx = open_context(cfg)?;
            let reference = ReferenceMonth {
                year: *year,
                month: *month,
            };
            let schedule = ScheduleLogic::upload_bytes(&ctx, bytes, &filename, reference)?;

            success(format!(
                "Imported {} work day(s) from {} (schedule {})",
                schedule.entries.len(),
                filename,
                schedule.id
            ));
            if let (Some(first), Some(last)) = (schedule.entries.first(), schedule.entries.last()) {
                info(format!("Period: {} → {}", first.date, last.date));
            }
        }
        Commands::Manual { entries } => {
            let parsed = entries
                .iter()
                .map(|raw| parse_manual_entry(raw))
                .collect::<AppResult<Vec<_>>>()?;

            let ctx = open_context(cfg)?;
            let schedule = ScheduleLogic::upload_manual(&ctx, parsed)?;

            success(format!(
                "Stored {} work day(s) (schedule {})",
                schedule.entries.len(),
                schedule.id
            ));
        }
        _ => {}
    }
    Ok(())
}

/// `DATE,START,END`
fn parse_manual_entry(raw: &str) -> AppResult<ScheduleEntry> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [date, start, end] = parts.as_slice() else {
        return Err(AppError::Validation(format!(
            "expected DATE,START,END, got '{raw}'"
        )));
    };

    Ok(ScheduleEntry::new(
        parse_date_arg(date)?,
        parse_time_arg(start)?,
        parse_time_arg(end)?,
    ))
}
