use crate::cli::commands::open_context;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings::SettingsLogic;
use crate::errors::{AppError, AppResult};
use crate::models::settings::{Settings, SettingsUpdate, WorkLocation};
use crate::ui::messages::{header, success};
use crate::utils::path::expand_tilde;
use std::fs;

fn print_settings(s: &Settings) -> AppResult<()> {
    header("Settings");
    let yaml = serde_yaml::to_string(s)
        .map_err(|e| AppError::Other(format!("cannot render settings: {e}")))?;
    println!("{yaml}");
    Ok(())
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings {
        print,
        recipient,
        subject,
        template_file,
        reminder_interval,
        reminder_duration,
        threshold,
        auto_send,
        tz_offset,
        work_lat,
        work_lon,
        radius,
    } = cmd
    {
        let template = template_file
            .as_deref()
            .map(|p| fs::read_to_string(expand_tilde(p)))
            .transpose()?;

        let work_location = match (work_lat, work_lon) {
            (Some(latitude), Some(longitude)) => Some(WorkLocation {
                latitude: *latitude,
                longitude: *longitude,
                radius_meters: radius.unwrap_or(100.0),
            }),
            _ => None,
        };

        let patch = SettingsUpdate {
            reminder_interval_min: *reminder_interval,
            reminder_duration_sec: *reminder_duration,
            work_location,
            recipient_email: recipient.clone(),
            email_subject: subject.clone(),
            email_body_template: template,
            overtime_threshold_minutes: *threshold,
            auto_send_on_geofence: *auto_send,
            timezone_offset_hours: *tz_offset,
        };

        let ctx = open_context(cfg)?;

        if patch.is_empty() {
            print_settings(&SettingsLogic::get(&ctx)?)?;
            return Ok(());
        }

        let updated = SettingsLogic::update(&ctx, patch)?;
        success("Settings updated");
        if *print {
            print_settings(&updated)?;
        }
    }
    Ok(())
}
