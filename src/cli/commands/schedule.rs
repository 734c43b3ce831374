use crate::cli::commands::open_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::schedule::ScheduleLogic;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success};
use crate::utils::table::Table;
use crate::utils::time::format_time;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule { print, delete } = cmd {
        let ctx = open_context(cfg)?;

        if let Some(id) = delete {
            ScheduleLogic::delete(&ctx, id)?;
            success(format!("Schedule {id} deleted"));
        }

        if *print || delete.is_none() {
            match ScheduleLogic::current(&ctx)? {
                None => info("No schedule uploaded yet."),
                Some(schedule) => {
                    header(format!(
                        "Schedule {} ({}, uploaded {})",
                        schedule.id,
                        schedule.source_name,
                        schedule.uploaded_at.format("%Y-%m-%d %H:%M UTC")
                    ));

                    let mut table = Table::new(&["DATE", "START", "END"]);
                    for e in &schedule.entries {
                        table.add_row(vec![
                            e.date.to_string(),
                            format_time(e.start),
                            format_time(e.end),
                        ]);
                    }
                    print!("{}", table.render());
                }
            }
        }
    }
    Ok(())
}
