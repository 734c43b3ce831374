use crate::core::context::AppContext;
use crate::db::log::ttlog;
use crate::db::settings::{load_settings, save_settings};
use crate::errors::{AppError, AppResult};
use crate::models::settings::{Settings, SettingsUpdate};
use rusqlite::Connection;

fn load_or_init(conn: &Connection) -> AppResult<Settings> {
    match load_settings(conn)? {
        Some(s) => Ok(s),
        None => {
            let defaults = Settings::default();
            save_settings(conn, &defaults)?;
            ttlog(conn, "settings", "defaults", "default settings created")?;
            Ok(defaults)
        }
    }
}

pub struct SettingsLogic;

impl SettingsLogic {
    /// Current settings; defaults are created and persisted on first read.
    pub fn get(ctx: &AppContext) -> AppResult<Settings> {
        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            let settings = load_or_init(&tx)?;
            tx.commit()?;
            Ok(settings)
        })
    }

    /// Merge the supplied fields into the stored settings.
    pub fn update(ctx: &AppContext, patch: SettingsUpdate) -> AppResult<Settings> {
        if let Some(h) = patch.timezone_offset_hours
            && !(-12..=14).contains(&h)
        {
            return Err(AppError::Validation(format!(
                "timezone offset must be between -12 and 14 hours, got {h}"
            )));
        }

        let now = ctx.now_utc();

        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            let mut settings = load_or_init(&tx)?;

            let changed = !patch.is_empty();
            patch.apply(&mut settings);
            settings.updated_at = Some(now);

            save_settings(&tx, &settings)?;
            ttlog(
                &tx,
                "settings",
                "update",
                if changed { "settings updated" } else { "settings touched (no fields)" },
            )?;
            tx.commit()?;
            Ok(settings)
        })
    }
}
