//! Tabular schedule parsing: raw cells → validated `ScheduleEntry` list.

use super::columns::ColumnRoles;
use super::rollover::{DecreasingDayRollover, MonthRollover};
use crate::errors::AppResult;
use crate::models::absence::AbsenceMarker;
use crate::models::schedule::ScheduleEntry;
use crate::utils::date::{current_year_month, days_in_month, parse_table_date};
use crate::utils::time::parse_time;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

/// Header plus data rows, all cells rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// The day/date cell after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    FullDate(NaiveDate),
    DayOfMonth(u32),
}

/// One row whose cells passed the exclusion checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub day: DayCell,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDay,
    Absence(AbsenceMarker),
    MissingStart,
    BadDate(String),
    DayOutOfRange(String),
    DayNotInMonth { day: u32, year: i32, month: u32 },
    BadTime(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingDay => write!(f, "no day/date"),
            SkipReason::Absence(m) => write!(f, "absence marker {}", m.code()),
            SkipReason::MissingStart => write!(f, "no start time"),
            SkipReason::BadDate(s) => write!(f, "unrecognized date '{s}'"),
            SkipReason::DayOutOfRange(s) => write!(f, "day '{s}' is not in 1-31"),
            SkipReason::DayNotInMonth { day, year, month } => {
                write!(f, "day {day} does not exist in {year}-{month:02}")
            }
            SkipReason::BadTime(s) => write!(f, "invalid time '{s}'"),
        }
    }
}

const MISSING: [&str; 4] = ["", "nan", "NaN", "None"];

fn is_missing(cell: &str) -> bool {
    MISSING.contains(&cell.trim())
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// Bare day-of-month. Spreadsheets hand integers back as `5.0`.
fn parse_day_number(raw: &str) -> Option<u32> {
    let s = raw.strip_suffix(".0").unwrap_or(raw);
    s.parse::<u32>().ok()
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime, SkipReason> {
    parse_time(raw).ok_or_else(|| SkipReason::BadTime(raw.to_string()))
}

/// Classify one row. Order of checks matters: missing day, absence markers,
/// missing start, then day/date shape and times.
fn classify(row: &[String], roles: &ColumnRoles) -> Result<ScheduleRow, SkipReason> {
    let day_raw = cell(row, roles.day);
    let start_raw = cell(row, roles.start);
    let end_raw = cell(row, roles.end);

    if is_missing(day_raw) {
        return Err(SkipReason::MissingDay);
    }

    if let Some(m) = AbsenceMarker::from_cell(start_raw).or_else(|| AbsenceMarker::from_cell(end_raw)) {
        return Err(SkipReason::Absence(m));
    }

    if is_missing(start_raw)
        || start_raw == "00:00"
        || parse_time(start_raw) == Some(NaiveTime::MIN)
    {
        return Err(SkipReason::MissingStart);
    }

    let day = if day_raw.contains('-') || day_raw.contains('/') {
        parse_table_date(day_raw)
            .map(DayCell::FullDate)
            .ok_or_else(|| SkipReason::BadDate(day_raw.to_string()))?
    } else {
        match parse_day_number(day_raw) {
            Some(d) if (1..=31).contains(&d) => DayCell::DayOfMonth(d),
            _ => return Err(SkipReason::DayOutOfRange(day_raw.to_string())),
        }
    };

    Ok(ScheduleRow {
        day,
        start: parse_hhmm(start_raw)?,
        end: parse_hhmm(end_raw)?,
    })
}

/// Turn a classified row into a calendar date, consulting the rollover strategy
/// for bare day numbers.
fn resolve_date(day: DayCell, rollover: &mut dyn MonthRollover) -> Result<NaiveDate, SkipReason> {
    match day {
        DayCell::FullDate(d) => Ok(d),
        DayCell::DayOfMonth(d) => {
            let (year, month) = rollover.month_for(d);
            let in_month = days_in_month(year, month).is_some_and(|n| d <= n);
            let date = NaiveDate::from_ymd_opt(year, month, d).filter(|_| in_month);

            match date {
                Some(date) => {
                    rollover.commit(d);
                    Ok(date)
                }
                None => Err(SkipReason::DayNotInMonth {
                    day: d,
                    year,
                    month,
                }),
            }
        }
    }
}

/// Parse with the default month rollover, starting at `reference` or the
/// current month.
pub fn parse_table(table: &RawTable, reference: Option<(i32, u32)>) -> AppResult<Vec<ScheduleEntry>> {
    let (year, month) = reference.unwrap_or_else(current_year_month);
    let mut rollover = DecreasingDayRollover::new(year, month);
    parse_table_with(table, &mut rollover)
}

/// Parse with a caller-provided rollover strategy.
pub fn parse_table_with(
    table: &RawTable,
    rollover: &mut dyn MonthRollover,
) -> AppResult<Vec<ScheduleEntry>> {
    let roles = ColumnRoles::resolve(&table.headers)?;
    log::debug!(
        "schedule columns: day={} start={} end={}",
        roles.day,
        roles.start,
        roles.end
    );

    let mut entries = Vec::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let parsed = classify(row, &roles).and_then(|r| {
            let date = resolve_date(r.day, rollover)?;
            Ok(ScheduleEntry::new(date, r.start, r.end))
        });

        match parsed {
            Ok(entry) => entries.push(entry),
            // header is line 1
            Err(reason) => log::warn!("schedule row {} skipped: {reason}", idx + 2),
        }
    }

    Ok(entries)
}
