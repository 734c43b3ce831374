//! Time sources and the organizational time-zone policy.

use crate::errors::{AppError, AppResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

/// Source of "now". Injected so session ends are reproducible in tests.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed organizational UTC offset.
///
/// End instants are taken in this offset and naive timestamps are read as
/// wall-clock times in it. No daylight-saving adjustment is applied: a
/// worker observing summer time sees results shifted by one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePolicy {
    offset: FixedOffset,
}

const ORGANIZATION_OFFSET_SECS: i32 = 2 * 3600;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

impl TimePolicy {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn from_offset_hours(hours: i32) -> AppResult<Self> {
        hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| AppError::Config(format!("invalid UTC offset: {hours} hours")))
    }

    /// The default organizational policy (+02:00).
    pub fn organization() -> Self {
        FixedOffset::east_opt(ORGANIZATION_OFFSET_SECS)
            .map(Self::new)
            .unwrap_or_else(|| Self::new(Utc.fix()))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Read a naive wall-clock value as local time in the organizational offset.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        DateTime::from_naive_utc_and_offset(naive - self.offset, self.offset)
    }

    pub fn at(&self, date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
        self.localize(date.and_time(time))
    }

    /// Current instant expressed in the organizational offset.
    pub fn now(&self, clock: &dyn Clock) -> DateTime<FixedOffset> {
        clock.now_utc().with_timezone(&self.offset)
    }

    /// Parse a client timestamp. Values carrying an offset keep it, naive
    /// values are localized.
    pub fn parse_timestamp(&self, raw: &str) -> AppResult<DateTime<FixedOffset>> {
        let s = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt);
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Ok(dt);
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| self.localize(naive))
            .ok_or_else(|| AppError::InvalidTimestamp(raw.to_string()))
    }
}

impl Default for TimePolicy {
    fn default() -> Self {
        Self::organization()
    }
}
