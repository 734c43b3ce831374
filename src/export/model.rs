use crate::models::session::WorkSession;
use crate::utils::formatting::or_dash;
use crate::utils::time::format_time;
use serde::Serialize;

/// Flat view of a session for CSV / JSON / XLSX. Photos are counted, not exported.
#[derive(Serialize, Clone, Debug)]
pub struct SessionExport {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub scheduled_start: String,
    pub scheduled_end: String,
    pub overtime_minutes: Option<i64>,
    pub photo_count: usize,
    pub email_sent: bool,
}

impl From<&WorkSession> for SessionExport {
    fn from(s: &WorkSession) -> Self {
        Self {
            id: s.id.clone(),
            date: s.date.format("%Y-%m-%d").to_string(),
            start_time: s.start_time.format("%Y-%m-%d %H:%M").to_string(),
            end_time: or_dash(s.end_time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())),
            scheduled_start: or_dash(s.scheduled_start.map(format_time)),
            scheduled_end: or_dash(s.scheduled_end.map(format_time)),
            overtime_minutes: s.overtime_minutes,
            photo_count: s.photo_count(),
            email_sent: s.email_sent,
        }
    }
}

pub(crate) fn get_headers() -> Vec<&'static str> {
    vec![
        "id",
        "date",
        "start_time",
        "end_time",
        "scheduled_start",
        "scheduled_end",
        "overtime_minutes",
        "photo_count",
        "email_sent",
    ]
}

pub(crate) fn session_to_row(e: &SessionExport) -> Vec<String> {
    vec![
        e.id.clone(),
        e.date.clone(),
        e.start_time.clone(),
        e.end_time.clone(),
        e.scheduled_start.clone(),
        e.scheduled_end.clone(),
        e.overtime_minutes.map(|m| m.to_string()).unwrap_or_default(),
        e.photo_count.to_string(),
        if e.email_sent { "yes" } else { "no" }.to_string(),
    ]
}
