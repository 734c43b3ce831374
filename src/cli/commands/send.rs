use crate::cli::commands::open_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Send { session_id } = cmd {
        let ctx = open_context(cfg)?;
        let session = ReportLogic::send(&ctx, session_id)?;
        success(format!(
            "Overtime report for {} sent ({} photo(s))",
            session.date,
            session.photo_count()
        ));
    }
    Ok(())
}
