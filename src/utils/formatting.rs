//! Formatting utilities used for CLI, report and export outputs.

pub fn mins2readable(mins: i64, want_sign: bool, short: bool) -> String {
    let abs_m = mins.abs();
    let hours = abs_m / 60;
    let minutes = abs_m % 60;

    let sign = if mins > 0 && want_sign {
        "+"
    } else if mins < 0 && want_sign {
        "-"
    } else {
        ""
    };

    if short {
        // e.g. +02:25
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        // e.g. +02h 25m
        format!("{}{:02}h {:02}m", sign, hours, minutes)
    }
}

/// Minutes as decimal hours with two digits (`90` → `1.50`).
pub fn hours_2dp(mins: i64) -> String {
    format!("{:.2}", mins as f64 / 60.0)
}

/// Placeholder for absent optional values in tables and reports.
pub fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}
