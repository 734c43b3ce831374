mod common;
use common::{FailingMailer, ctx_with, date, entry, hm, utc};
use rovertime::core::context::AppContext;
use rovertime::core::schedule::{ReferenceMonth, ScheduleLogic};
use rovertime::errors::{AppError, ErrorKind};
use rovertime::utils::blob::encode_base64;
use rust_xlsxwriter::Workbook;

fn ctx() -> AppContext {
    ctx_with(utc(2025, 1, 10, 8, 0), Box::new(FailingMailer))
}

fn january() -> ReferenceMonth {
    ReferenceMonth {
        year: Some(2025),
        month: Some(1),
    }
}

#[test]
fn test_upload_csv_file() {
    let ctx = ctx();
    let csv = "Diena,Pradžia,Pabaiga\n28,09:00,17:00\n29,P,P\n30,08:00,16:00\n1,10:00,18:00\n";

    let schedule =
        ScheduleLogic::upload_file(&ctx, &encode_base64(csv.as_bytes()), "grafikas.csv", january())
            .unwrap();

    assert_eq!(schedule.source_name, "grafikas.csv");
    assert_eq!(schedule.entries.len(), 3);
    assert_eq!(schedule.entries[0], entry(date(2025, 1, 28), hm(9, 0), hm(17, 0)));
    assert_eq!(schedule.entries[2].date, date(2025, 2, 1));

    let current = ScheduleLogic::current(&ctx).unwrap().expect("stored schedule");
    assert_eq!(current.id, schedule.id);
    assert_eq!(current.entries, schedule.entries);
}

#[test]
fn test_upload_csv_with_data_url_prefix() {
    let ctx = ctx();
    let csv = "date,start,end\n2025-03-03,07:00,15:00\n";
    let payload = format!("data:text/csv;base64,{}", encode_base64(csv.as_bytes()));

    let schedule = ScheduleLogic::upload_file(&ctx, &payload, "march.CSV", january()).unwrap();

    assert_eq!(schedule.entries.len(), 1);
    assert_eq!(schedule.entries[0].date, date(2025, 3, 3));
}

#[test]
fn test_upload_xlsx_file() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Diena").unwrap();
    sheet.write_string(0, 1, "Pradžia").unwrap();
    sheet.write_string(0, 2, "Pabaiga").unwrap();

    let rows = [(30, "09:00", "17:00"), (31, "BN", "BN"), (1, "08:00", "16:00")];
    for (i, (day, start, end)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_number(r, 0, *day).unwrap();
        sheet.write_string(r, 1, *start).unwrap();
        sheet.write_string(r, 2, *end).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let ctx = ctx();
    let schedule =
        ScheduleLogic::upload_file(&ctx, &encode_base64(&bytes), "grafikas.xlsx", january())
            .unwrap();

    assert_eq!(schedule.entries.len(), 2);
    assert_eq!(schedule.entries[0], entry(date(2025, 1, 30), hm(9, 0), hm(17, 0)));
    assert_eq!(schedule.entries[1], entry(date(2025, 2, 1), hm(8, 0), hm(16, 0)));
}

#[test]
fn test_upload_txt_lines() {
    let ctx = ctx();
    let txt = "2025-01-15,09:00,17:00\n2025-01-16,09:00,17:30\n";

    let schedule =
        ScheduleLogic::upload_file(&ctx, &encode_base64(txt.as_bytes()), "shifts.txt", january())
            .unwrap();

    assert_eq!(schedule.entries.len(), 2);
    assert_eq!(schedule.entries[1].end, hm(17, 30));
}

#[test]
fn test_upload_unsupported_type_is_validation_error() {
    let ctx = ctx();
    let err = ScheduleLogic::upload_file(&ctx, &encode_base64(b"%PDF"), "schedule.pdf", january())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Unsupported file type"));
    assert!(ScheduleLogic::current(&ctx).unwrap().is_none());
}

#[test]
fn test_upload_bad_base64_is_validation_error() {
    let ctx = ctx();
    let err = ScheduleLogic::upload_file(&ctx, "!!not base64!!", "a.csv", january()).unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn test_upload_without_valid_rows_stores_nothing() {
    let ctx = ctx();
    let csv = "Diena,Pradžia,Pabaiga\n1,P,P\n2,00:00,00:00\n";

    let err =
        ScheduleLogic::upload_file(&ctx, &encode_base64(csv.as_bytes()), "empty.csv", january())
            .unwrap_err();

    assert!(err.to_string().contains("No valid schedule data found in file"));
    assert!(ScheduleLogic::current(&ctx).unwrap().is_none());
}

#[test]
fn test_upload_invalid_month_is_rejected() {
    let ctx = ctx();
    let csv = "day,start,end\n1,09:00,17:00\n";
    let reference = ReferenceMonth {
        year: Some(2025),
        month: Some(13),
    };

    let err = ScheduleLogic::upload_file(&ctx, &encode_base64(csv.as_bytes()), "a.csv", reference)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_manual_upload_and_latest_wins() {
    let ctx = ctx();

    let first = ScheduleLogic::upload_manual(
        &ctx,
        vec![entry(date(2025, 1, 15), hm(9, 0), hm(17, 0))],
    )
    .unwrap();
    let second = ScheduleLogic::upload_manual(
        &ctx,
        vec![
            entry(date(2025, 1, 20), hm(7, 0), hm(15, 0)),
            entry(date(2025, 1, 21), hm(7, 0), hm(15, 0)),
        ],
    )
    .unwrap();

    assert_eq!(second.source_name, "manual");

    let current = ScheduleLogic::current(&ctx).unwrap().unwrap();
    assert_eq!(current.id, second.id);
    assert_ne!(current.id, first.id);
    assert_eq!(current.entries.len(), 2);
}

#[test]
fn test_manual_upload_requires_entries() {
    let ctx = ctx();
    let err = ScheduleLogic::upload_manual(&ctx, Vec::new()).unwrap_err();
    assert!(err.to_string().contains("No work days provided"));
}

#[test]
fn test_duplicate_dates_first_entry_wins() {
    let ctx = ctx();
    let schedule = ScheduleLogic::upload_manual(
        &ctx,
        vec![
            entry(date(2025, 1, 15), hm(9, 0), hm(17, 0)),
            entry(date(2025, 1, 15), hm(12, 0), hm(20, 0)),
        ],
    )
    .unwrap();

    assert_eq!(schedule.entries.len(), 2);
    let hit = schedule.entry_for(date(2025, 1, 15)).unwrap();
    assert_eq!(hit.start, hm(9, 0));
}

#[test]
fn test_delete_schedule() {
    let ctx = ctx();
    let schedule = ScheduleLogic::upload_manual(
        &ctx,
        vec![entry(date(2025, 1, 15), hm(9, 0), hm(17, 0))],
    )
    .unwrap();

    ScheduleLogic::delete(&ctx, &schedule.id).unwrap();
    assert!(ScheduleLogic::current(&ctx).unwrap().is_none());

    let err = ScheduleLogic::delete(&ctx, &schedule.id).unwrap_err();
    assert!(matches!(err, AppError::ScheduleNotFound(_)));
    assert_eq!(err.status(), 404);
}
