use crate::errors::{AppError, AppResult};
use crate::utils::date::days_in_month;
use chrono::NaiveDate;

fn range_error(msg: &str, raw: &str) -> AppError {
    AppError::Validation(format!("{msg}: '{raw}'"))
}

/// First and last day covered by a single `YYYY`, `YYYY-MM` or `YYYY-MM-DD` token.
fn period_bounds(token: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match token.len() {
        4 => {
            let y: i32 = token.parse().map_err(|_| range_error("invalid year", token))?;
            let first = NaiveDate::from_ymd_opt(y, 1, 1);
            let last = NaiveDate::from_ymd_opt(y, 12, 31);
            first
                .zip(last)
                .ok_or_else(|| range_error("invalid year", token))
        }
        7 => {
            let (y, m) = token
                .split_once('-')
                .ok_or_else(|| range_error("invalid month", token))?;
            let y: i32 = y.parse().map_err(|_| range_error("invalid year", token))?;
            let m: u32 = m.parse().map_err(|_| range_error("invalid month", token))?;
            let last_day = days_in_month(y, m).ok_or_else(|| range_error("invalid month", token))?;

            NaiveDate::from_ymd_opt(y, m, 1)
                .zip(NaiveDate::from_ymd_opt(y, m, last_day))
                .ok_or_else(|| range_error("invalid month", token))
        }
        10 => {
            let d = NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .map_err(|_| range_error("invalid date", token))?;
            Ok((d, d))
        }
        _ => Err(range_error("unsupported --range format", token)),
    }
}

/// Parse `--range`.
///
/// Accepts:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub(crate) fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let r = r.trim();

    let Some((start_raw, end_raw)) = r.split_once(':') else {
        return period_bounds(r);
    };

    let start = start_raw.trim();
    let end = end_raw.trim();

    if start.len() != end.len() {
        return Err(range_error("start and end must have the same format", r));
    }

    let (from, _) = period_bounds(start)?;
    let (_, to) = period_bounds(end)?;

    if from > to {
        return Err(range_error("range start is after its end", r));
    }

    Ok((from, to))
}
