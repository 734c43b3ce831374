use crate::utils::time::hhmm;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One scheduled shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate, // ⇔ schedule_entries.date (TEXT "YYYY-MM-DD")
    #[serde(with = "hhmm")]
    pub start: NaiveTime, // ⇔ schedule_entries.start (TEXT "HH:MM")
    #[serde(with = "hhmm")]
    pub end: NaiveTime, // ⇔ schedule_entries.end (TEXT "HH:MM")
}

impl ScheduleEntry {
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        Self { date, start, end }
    }
}

/// An uploaded schedule. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub entries: Vec<ScheduleEntry>,
    pub uploaded_at: DateTime<Utc>,
    pub source_name: String,
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>, source_name: &str, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            entries,
            uploaded_at,
            source_name: source_name.to_string(),
        }
    }

    /// First entry for `date`; duplicates are kept in upload order.
    pub fn entry_for(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.date == date)
    }
}
