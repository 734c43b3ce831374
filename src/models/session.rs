use super::schedule::ScheduleEntry;
use crate::utils::time::hhmm_opt;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One clock-in / clock-out of a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkSession {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: Option<DateTime<FixedOffset>>,
    /// base64 payloads, in upload order
    pub photos: Vec<String>,
    #[serde(default, with = "hhmm_opt")]
    pub scheduled_start: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt")]
    pub scheduled_end: Option<NaiveTime>,
    pub overtime_minutes: Option<i64>,
    pub email_sent: bool,
    pub start_location: Option<GeoPoint>,
    pub end_location: Option<GeoPoint>,
    pub created_at: DateTime<Utc>,
}

impl WorkSession {
    /// Fresh, active session. Scheduled times are copied from `scheduled` when present.
    pub fn new(
        date: NaiveDate,
        start_time: DateTime<FixedOffset>,
        scheduled: Option<&ScheduleEntry>,
        start_location: Option<GeoPoint>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            start_time,
            end_time: None,
            photos: Vec::new(),
            scheduled_start: scheduled.map(|e| e.start),
            scheduled_end: scheduled.map(|e| e.end),
            overtime_minutes: None,
            email_sent: false,
            start_location,
            end_location: None,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }
}
