mod common;
use common::{date, hm};
use rovertime::core::schedule::lines::parse_lines;
use rovertime::core::schedule::table::parse_table_with;
use rovertime::core::schedule::{ColumnRoles, DecreasingDayRollover, RawTable, parse_table};
use rovertime::errors::AppError;

fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}

#[test]
fn test_columns_resolved_from_lithuanian_headers() {
    let roles = ColumnRoles::resolve(&["Pastabos", "Pabaiga", "Diena", "Pradžia"]).unwrap();
    assert_eq!(roles.day, 2);
    assert_eq!(roles.start, 3);
    assert_eq!(roles.end, 1);
}

#[test]
fn test_columns_resolved_from_english_headers_case_insensitive() {
    let roles = ColumnRoles::resolve(&["DATE", "Shift Start", "Shift END"]).unwrap();
    assert_eq!((roles.day, roles.start, roles.end), (0, 1, 2));
}

#[test]
fn test_columns_positional_fallback() {
    let roles = ColumnRoles::resolve(&["A", "B", "C", "D"]).unwrap();
    assert_eq!((roles.day, roles.start, roles.end), (0, 1, 2));
}

#[test]
fn test_columns_too_few_is_parse_error() {
    let err = ColumnRoles::resolve(&["x", "y"]).unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
}

#[test]
fn test_columns_positional_collision_is_parse_error() {
    // "day" found at index 1 collides with the positional start column
    let err = ColumnRoles::resolve(&["x", "Day", "y"]).unwrap_err();
    assert!(matches!(err, AppError::Parse(_)));
}

#[test]
fn test_day_numbers_roll_over_into_next_month() {
    let t = table(
        &["Diena", "Pradžia", "Pabaiga"],
        &[
            &["28", "09:00", "17:00"],
            &["29", "09:00", "17:00"],
            &["30", "09:00", "17:00"],
            &["1", "10:00", "18:00"],
            &["2", "10:00", "18:00"],
        ],
    );

    let entries = parse_table(&t, Some((2025, 1))).unwrap();
    let dates: Vec<_> = entries.iter().map(|e| e.date).collect();

    assert_eq!(
        dates,
        vec![
            date(2025, 1, 28),
            date(2025, 1, 29),
            date(2025, 1, 30),
            date(2025, 2, 1),
            date(2025, 2, 2),
        ]
    );
    assert_eq!(entries[3].start, hm(10, 0));
    assert_eq!(entries[3].end, hm(18, 0));
}

#[test]
fn test_rollover_wraps_december_into_next_year() {
    let t = table(
        &["day", "start", "end"],
        &[&["31", "08:00", "16:00"], &["1", "08:00", "16:00"]],
    );

    let mut rollover = DecreasingDayRollover::new(2024, 12);
    let entries = parse_table_with(&t, &mut rollover).unwrap();

    assert_eq!(entries[0].date, date(2024, 12, 31));
    assert_eq!(entries[1].date, date(2025, 1, 1));
}

#[test]
fn test_absence_markers_and_empty_rows_are_skipped() {
    let t = table(
        &["Diena", "Pradžia", "Pabaiga"],
        &[
            &["1", "09:00", "17:00"],
            &["2", "P", "P"],
            &["3", "m", ""],
            &["4", "A", "A"],
            &["5", "BN", "BN"],
            &["6", "00:00", "00:00"],
            &["7", "", ""],
            &["", "09:00", "17:00"],
            &["nan", "09:00", "17:00"],
            &["8", "08:30", "16:30"],
            &["9", "0:00", "0:00"],
            &["10", "00:00:00", "00:00:00"],
        ],
    );

    let entries = parse_table(&t, Some((2025, 3))).unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.start != hm(0, 0)));
    assert_eq!(entries[0].date, date(2025, 3, 1));
    assert_eq!(entries[1].date, date(2025, 3, 8));
    assert_eq!(entries[1].start, hm(8, 30));
}

#[test]
fn test_midnight_start_in_any_format_is_skipped() {
    let t = table(
        &["Diena", "Pradžia", "Pabaiga"],
        &[
            &["1", "0:00", "0:00"],
            &["2", "00:00:00", "00:00:00"],
            &["3", "09:00", "17:00"],
        ],
    );

    let entries = parse_table(&t, Some((2025, 3))).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, date(2025, 3, 3));
}

#[test]
fn test_invalid_rows_are_skipped_not_fatal() {
    let t = table(
        &["day", "start", "end"],
        &[
            &["32", "09:00", "17:00"],
            &["0", "09:00", "17:00"],
            &["abc", "09:00", "17:00"],
            &["3", "9am", "17:00"],
            &["4", "09:00", "late"],
            &["5", "09:00", "17:00"],
        ],
    );

    let entries = parse_table(&t, Some((2025, 3))).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, date(2025, 3, 5));
}

#[test]
fn test_day_missing_from_month_is_skipped() {
    let t = table(
        &["day", "start", "end"],
        &[&["30", "09:00", "17:00"], &["31", "09:00", "17:00"]],
    );

    // February 2025 has 28 days; 30 and 31 do not decrease so no rollover happens
    let entries = parse_table(&t, Some((2025, 2))).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn test_spreadsheet_float_day_numbers() {
    let t = table(
        &["Diena", "Pradžia", "Pabaiga"],
        &[&["5.0", "09:00", "17:00"], &["6.0", "09:00:00", "17:00:00"]],
    );

    let entries = parse_table(&t, Some((2025, 6))).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, date(2025, 6, 5));
    assert_eq!(entries[1].end, hm(17, 0));
}

#[test]
fn test_full_dates_ignore_rollover() {
    let t = table(
        &["Data", "Pradžia", "Pabaiga"],
        &[
            &["2025-01-15", "09:00", "17:00"],
            &["2025/01/16", "09:00", "17:00"],
            &["17/01/2025", "09:00", "17:00"],
            &["2025-01-18 00:00:00", "09:00", "17:00"],
            &["2025-13-40", "09:00", "17:00"],
        ],
    );

    let entries = parse_table(&t, Some((2030, 6))).unwrap();
    let dates: Vec<_> = entries.iter().map(|e| e.date).collect();

    assert_eq!(
        dates,
        vec![
            date(2025, 1, 15),
            date(2025, 1, 16),
            date(2025, 1, 17),
            date(2025, 1, 18),
        ]
    );
}

#[test]
fn test_lines_parser_skips_comments_and_bad_lines() {
    let text = "# shifts for January\n\
                2025-01-15,09:00,17:00\n\
                \n\
                2025-01-16, 08:00 , 16:30\n\
                not-a-date,09:00,17:00\n\
                2025-01-17,09:00\n";

    let entries = parse_lines(text);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, date(2025, 1, 15));
    assert_eq!(entries[1].start, hm(8, 0));
    assert_eq!(entries[1].end, hm(16, 30));
}
