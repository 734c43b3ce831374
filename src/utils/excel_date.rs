// Excel serial date/time conversions in both directions.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// Interpret a string as a datetime, date or time and return the
/// Excel number format together with the serial value.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    let dt_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in dt_formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            let serial = naive_datetime_to_excel_serial(&dt)?;
            return Some(("yyyy-mm-dd hh:mm", serial));
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let serial = naive_datetime_to_excel_serial(&d.and_hms_opt(0, 0, 0)?)?;
        return Some(("yyyy-mm-dd", serial));
    }

    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M") {
        let seconds = t.num_seconds_from_midnight() as f64;
        return Some(("hh:mm", seconds / 86400.0));
    }

    None
}

fn naive_datetime_to_excel_serial(dt: &NaiveDateTime) -> Option<f64> {
    let duration = *dt - excel_epoch()?;

    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    Some(days + secs / 86400.0)
}

/// Render an Excel serial as text the schedule parser understands:
/// pure fractions become `HH:MM`, whole numbers `YYYY-MM-DD`,
/// anything else `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn excel_serial_to_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }

    // round to the nearest second so 0.7083333 renders as 17:00
    let total_secs = (serial * 86400.0).round() as i64;
    let dt = excel_epoch()? + TimeDelta::try_seconds(total_secs)?;

    if serial < 1.0 {
        return Some(dt.time().format("%H:%M").to_string());
    }

    if total_secs % 86400 == 0 {
        return Some(dt.date().format("%Y-%m-%d").to_string());
    }

    Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
