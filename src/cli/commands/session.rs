use crate::cli::commands::{geo, open_context, sessions_table};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::context::AppContext;
use crate::core::session::{SessionEdit, SessionLogic};
use crate::errors::{AppError, AppResult};
use crate::models::session::WorkSession;
use crate::ui::messages::{info, success, warning};
use crate::utils::blob::encode_base64;
use crate::utils::date::parse_date_arg;
use crate::utils::formatting::mins2readable;
use crate::utils::path::expand_tilde;
use crate::utils::time::{format_time, parse_time};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::fs;

/// `HH:MM` is taken on `date`; anything else must be a full timestamp.
fn parse_cli_timestamp(
    ctx: &AppContext,
    raw: &str,
    date: NaiveDate,
) -> AppResult<DateTime<FixedOffset>> {
    match parse_time(raw) {
        Some(t) => Ok(ctx.policy().at(date, t)),
        None => ctx.policy().parse_timestamp(raw),
    }
}

fn print_session(s: &WorkSession) {
    print!("{}", sessions_table(std::slice::from_ref(s)).render());
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Start { date, at, lat, lon } => {
            let ctx = open_context(cfg)?;

            let date_arg = date.as_deref().map(parse_date_arg).transpose()?;
            let start = match at {
                Some(raw) => {
                    let day = date_arg.unwrap_or_else(|| ctx.now().date_naive());
                    parse_cli_timestamp(&ctx, raw, day)?
                }
                None => ctx.now(),
            };
            let date = date_arg
                .unwrap_or_else(|| start.with_timezone(&ctx.policy().offset()).date_naive());

            let session = SessionLogic::start(&ctx, date, start, geo(*lat, *lon))?;

            success(format!("Session {} started", session.id));
            match (session.scheduled_start, session.scheduled_end) {
                (Some(a), Some(b)) => info(format!(
                    "Scheduled shift: {}-{}",
                    format_time(a),
                    format_time(b)
                )),
                _ => warning(format!("No scheduled shift found for {date}")),
            }
        }

        Commands::End { session_id, lat, lon } => {
            let ctx = open_context(cfg)?;
            let session = SessionLogic::end(&ctx, session_id, geo(*lat, *lon))?;
            let overtime = session.overtime_minutes.unwrap_or(0);

            success(format!("Session {} ended", session.id));
            info(format!(
                "Overtime: {} ({} min)",
                mins2readable(overtime, false, false),
                overtime
            ));
        }

        Commands::Edit {
            session_id,
            start,
            end,
            date,
        } => {
            if start.is_none() && end.is_none() && date.is_none() {
                return Err(AppError::Validation(
                    "nothing to edit: pass --start, --end or --date".to_string(),
                ));
            }

            let ctx = open_context(cfg)?;
            let current = SessionLogic::get(&ctx, session_id)?;

            let date = match date {
                Some(raw) => parse_date_arg(raw)?,
                None => current.date,
            };
            let edit = SessionEdit {
                start: match start {
                    Some(raw) => parse_cli_timestamp(&ctx, raw, date)?,
                    None => current.start_time,
                },
                end: end
                    .as_deref()
                    .map(|raw| parse_cli_timestamp(&ctx, raw, date))
                    .transpose()?,
                date,
            };

            let session = SessionLogic::edit(&ctx, session_id, edit)?;
            success(format!("Session {} updated", session.id));
            print_session(&session);
        }

        Commands::Photo { session_id, file } => {
            let bytes = fs::read(expand_tilde(file))?;
            let ctx = open_context(cfg)?;
            let count = SessionLogic::add_photo(&ctx, session_id, &encode_base64(&bytes))?;
            success(format!("Photo added to session {session_id} ({count} total)"));
        }

        Commands::Active => {
            let ctx = open_context(cfg)?;
            match SessionLogic::active(&ctx)? {
                Some(s) => print_session(&s),
                None => info("No active session."),
            }
        }

        Commands::History { limit } => {
            let ctx = open_context(cfg)?;
            let sessions = SessionLogic::history(&ctx, *limit)?;
            if sessions.is_empty() {
                info("No sessions recorded yet.");
            } else {
                print!("{}", sessions_table(&sessions).render());
            }
        }

        _ => {}
    }
    Ok(())
}
