use crate::models::schedule::ScheduleEntry;
use crate::utils::date::parse_table_date;
use crate::utils::time::parse_time;

/// Parse `date,start,end` lines. `#` comments and blank lines are ignored;
/// there is no month rollover since every line carries a full date.
pub fn parse_lines(text: &str) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None => log::warn!("schedule line {} skipped: '{line}'", idx + 1),
        }
    }

    entries
}

fn parse_line(line: &str) -> Option<ScheduleEntry> {
    let mut parts = line.split(',').map(str::trim);

    let date = parse_table_date(parts.next()?)?;
    let start = parse_time(parts.next()?)?;
    let end = parse_time(parts.next()?)?;

    Some(ScheduleEntry::new(date, start, end))
}
