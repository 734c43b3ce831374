//! Column role resolution for uploaded schedule tables.

use crate::errors::{AppError, AppResult};

const DAY_TOKENS: [&str; 4] = ["day", "date", "diena", "data"];
const START_TOKENS: [&str; 2] = ["start", "prad"];
const END_TOKENS: [&str; 2] = ["end", "pab"];

/// Index of the day/date, start and end columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub day: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Day,
    Start,
    End,
}

/// First role whose token set matches the header (day, then start, then end).
fn role_of(header: &str) -> Option<Role> {
    let h = header.to_lowercase();
    let hit = |tokens: &[&str]| tokens.iter().any(|t| h.contains(t));

    if hit(&DAY_TOKENS) {
        Some(Role::Day)
    } else if hit(&START_TOKENS) {
        Some(Role::Start)
    } else if hit(&END_TOKENS) {
        Some(Role::End)
    } else {
        None
    }
}

impl ColumnRoles {
    /// Resolve roles from header names, falling back to positions 0/1/2.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> AppResult<Self> {
        let mut day = None;
        let mut start = None;
        let mut end = None;

        for (idx, header) in headers.iter().enumerate() {
            let slot = match role_of(header.as_ref()) {
                Some(Role::Day) => &mut day,
                Some(Role::Start) => &mut start,
                Some(Role::End) => &mut end,
                None => continue,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        let all_semantic = day.is_some() && start.is_some() && end.is_some();
        if headers.len() < 3 && !all_semantic {
            return Err(AppError::Parse(format!(
                "could not identify day, start and end columns in {} column(s)",
                headers.len()
            )));
        }

        let roles = Self {
            day: day.unwrap_or(0),
            start: start.unwrap_or(1),
            end: end.unwrap_or(2),
        };

        if roles.day == roles.start || roles.day == roles.end || roles.start == roles.end {
            return Err(AppError::Parse(format!(
                "ambiguous column layout: day={}, start={}, end={}",
                roles.day, roles.start, roles.end
            )));
        }

        Ok(roles)
    }
}
