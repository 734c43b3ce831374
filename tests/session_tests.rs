mod common;
use chrono::{TimeZone, Utc};
use common::{FailingMailer, ctx_with, date, entry, hm, utc};
use rovertime::core::context::AppContext;
use rovertime::core::schedule::ScheduleLogic;
use rovertime::core::session::{SessionEdit, SessionLogic};
use rovertime::errors::AppError;
use rovertime::models::session::GeoPoint;

fn ctx_at(y: i32, m: u32, d: u32, h: u32, min: u32) -> AppContext {
    ctx_with(utc(y, m, d, h, min), Box::new(FailingMailer))
}

fn with_schedule(ctx: &AppContext) {
    ScheduleLogic::upload_manual(
        ctx,
        vec![
            entry(date(2025, 1, 15), hm(9, 0), hm(17, 0)),
            entry(date(2025, 1, 16), hm(8, 0), hm(16, 0)),
        ],
    )
    .unwrap();
}

#[test]
fn test_start_copies_scheduled_times() {
    // 17:12 at +02:00
    let ctx = ctx_at(2025, 1, 15, 15, 12);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 5));
    let loc = GeoPoint {
        latitude: 54.68,
        longitude: 25.28,
    };
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, Some(loc)).unwrap();

    assert!(session.is_active());
    assert_eq!(session.scheduled_start, Some(hm(9, 0)));
    assert_eq!(session.scheduled_end, Some(hm(17, 0)));
    assert_eq!(session.start_location, Some(loc));
    assert_eq!(session.overtime_minutes, None);
    assert!(!session.email_sent);
    assert_eq!(session.photo_count(), 0);
}

#[test]
fn test_end_computes_overtime_past_scheduled_end() {
    let ctx = ctx_at(2025, 1, 15, 15, 12);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();

    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();

    assert_eq!(ended.overtime_minutes, Some(12));
    assert_eq!(
        ended.end_time.unwrap().format("%H:%M").to_string(),
        "17:12"
    );
    assert!(SessionLogic::active(&ctx).unwrap().is_none());
}

#[test]
fn test_end_before_scheduled_end_has_no_overtime() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();
    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();

    assert_eq!(ended.overtime_minutes, Some(0));
}

#[test]
fn test_end_without_schedule_has_no_overtime() {
    let ctx = ctx_at(2025, 1, 20, 20, 0);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 20), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 20), start, None).unwrap();
    assert_eq!(session.scheduled_end, None);

    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();
    assert_eq!(ended.overtime_minutes, Some(0));
}

#[test]
fn test_end_stores_location_and_persists() {
    let ctx = ctx_at(2025, 1, 16, 14, 30);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 16), hm(8, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 16), start, None).unwrap();
    let loc = GeoPoint {
        latitude: 1.5,
        longitude: -2.5,
    };
    SessionLogic::end(&ctx, &session.id, Some(loc)).unwrap();

    let stored = SessionLogic::get(&ctx, &session.id).unwrap();
    assert_eq!(stored.end_location, Some(loc));
    // 16:30 local against 16:00 scheduled
    assert_eq!(stored.overtime_minutes, Some(30));
}

#[test]
fn test_end_uses_local_calendar_date_of_end_instant() {
    // 22:30 UTC is already 00:30 on 2025-01-16 at +02:00
    let ctx = ctx_at(2025, 1, 15, 22, 30);
    ScheduleLogic::upload_manual(&ctx, vec![entry(date(2025, 1, 15), hm(9, 0), hm(17, 0))])
        .unwrap();

    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();
    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();

    // measured against 17:00 on 01-16, not 17:00 on 01-15
    assert_eq!(ended.overtime_minutes, Some(0));
    assert_eq!(
        ended.end_time.unwrap().format("%Y-%m-%d %H:%M").to_string(),
        "2025-01-16 00:30"
    );
}

#[test]
fn test_end_on_next_day_measures_against_that_day() {
    // 17:40 local on 2025-01-16
    let ctx = ctx_at(2025, 1, 16, 15, 40);
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 16), hm(8, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 16), start, None).unwrap();
    assert_eq!(session.scheduled_end, Some(hm(16, 0)));

    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();
    assert_eq!(ended.overtime_minutes, Some(100));
}

#[test]
fn test_end_overtime_floors_partial_minutes() {
    let now = Utc.with_ymd_and_hms(2025, 1, 15, 15, 12, 59).unwrap();
    let ctx = ctx_with(now, Box::new(FailingMailer));
    with_schedule(&ctx);

    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();
    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();

    assert_eq!(ended.overtime_minutes, Some(12));
}

#[test]
fn test_end_unknown_session_is_not_found() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    let err = SessionLogic::end(&ctx, "missing", None).unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound(_)));
}

#[test]
fn test_edit_recomputes_overtime_by_duration() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    with_schedule(&ctx);

    let p = *ctx.policy();
    let session =
        SessionLogic::start(&ctx, date(2025, 1, 15), p.at(date(2025, 1, 15), hm(9, 0)), None)
            .unwrap();

    let edited = SessionLogic::edit(
        &ctx,
        &session.id,
        SessionEdit {
            start: p.at(date(2025, 1, 15), hm(9, 0)),
            end: Some(p.at(date(2025, 1, 15), hm(17, 30))),
            date: date(2025, 1, 15),
        },
    )
    .unwrap();

    assert_eq!(edited.overtime_minutes, Some(30));
    assert!(!edited.is_active());
}

#[test]
fn test_edit_shorter_than_schedule_floors_at_zero() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    with_schedule(&ctx);

    let p = *ctx.policy();
    let session =
        SessionLogic::start(&ctx, date(2025, 1, 15), p.at(date(2025, 1, 15), hm(9, 0)), None)
            .unwrap();

    let edited = SessionLogic::edit(
        &ctx,
        &session.id,
        SessionEdit {
            start: p.at(date(2025, 1, 15), hm(10, 0)),
            end: Some(p.at(date(2025, 1, 15), hm(17, 0))),
            date: date(2025, 1, 15),
        },
    )
    .unwrap();

    assert_eq!(edited.overtime_minutes, Some(0));
}

#[test]
fn test_edit_without_end_keeps_end_and_overtime() {
    let ctx = ctx_at(2025, 1, 15, 15, 12);
    with_schedule(&ctx);

    let p = *ctx.policy();
    let session =
        SessionLogic::start(&ctx, date(2025, 1, 15), p.at(date(2025, 1, 15), hm(9, 0)), None)
            .unwrap();
    let ended = SessionLogic::end(&ctx, &session.id, None).unwrap();

    let edited = SessionLogic::edit(
        &ctx,
        &session.id,
        SessionEdit {
            start: p.at(date(2025, 1, 15), hm(8, 45)),
            end: None,
            date: date(2025, 1, 15),
        },
    )
    .unwrap();

    assert_eq!(edited.end_time, ended.end_time);
    assert_eq!(edited.overtime_minutes, Some(12));
    assert_eq!(edited.start_time.format("%H:%M").to_string(), "08:45");
}

#[test]
fn test_edit_without_schedule_sets_zero_overtime() {
    let ctx = ctx_at(2025, 1, 20, 15, 0);

    let p = *ctx.policy();
    let session =
        SessionLogic::start(&ctx, date(2025, 1, 20), p.at(date(2025, 1, 20), hm(9, 0)), None)
            .unwrap();

    let edited = SessionLogic::edit(
        &ctx,
        &session.id,
        SessionEdit {
            start: p.at(date(2025, 1, 20), hm(9, 0)),
            end: Some(p.at(date(2025, 1, 20), hm(20, 0))),
            date: date(2025, 1, 20),
        },
    )
    .unwrap();

    assert_eq!(edited.overtime_minutes, Some(0));
}

#[test]
fn test_naive_timestamp_is_read_in_organization_offset() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);

    let naive = ctx.policy().parse_timestamp("2025-01-15T09:00:00").unwrap();
    let explicit = ctx.policy().parse_timestamp("2025-01-15T07:00:00Z").unwrap();

    assert_eq!(naive, explicit);
    assert!(ctx.policy().parse_timestamp("yesterday").is_err());
}

#[test]
fn test_photos_are_counted_and_kept_in_order() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();

    assert_eq!(SessionLogic::add_photo(&ctx, &session.id, "AAAA").unwrap(), 1);
    assert_eq!(SessionLogic::add_photo(&ctx, &session.id, "BBBB").unwrap(), 2);

    let stored = SessionLogic::get(&ctx, &session.id).unwrap();
    assert_eq!(stored.photos, vec!["AAAA".to_string(), "BBBB".to_string()]);
}

#[test]
fn test_photo_on_unknown_session_is_not_found() {
    let ctx = ctx_at(2025, 1, 15, 15, 0);
    let err = SessionLogic::add_photo(&ctx, "nope", "AAAA").unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound(_)));
}

#[test]
fn test_active_returns_latest_started_session() {
    let ctx = ctx_at(2025, 1, 16, 15, 0);
    with_schedule(&ctx);
    let p = *ctx.policy();

    let older =
        SessionLogic::start(&ctx, date(2025, 1, 15), p.at(date(2025, 1, 15), hm(9, 0)), None)
            .unwrap();
    let newer =
        SessionLogic::start(&ctx, date(2025, 1, 16), p.at(date(2025, 1, 16), hm(8, 0)), None)
            .unwrap();

    assert_eq!(SessionLogic::active(&ctx).unwrap().unwrap().id, newer.id);

    SessionLogic::end(&ctx, &newer.id, None).unwrap();
    assert_eq!(SessionLogic::active(&ctx).unwrap().unwrap().id, older.id);

    SessionLogic::end(&ctx, &older.id, None).unwrap();
    assert!(SessionLogic::active(&ctx).unwrap().is_none());
}

#[test]
fn test_history_is_newest_first_and_limited() {
    let ctx = ctx_at(2025, 1, 20, 15, 0);
    let p = *ctx.policy();

    for day in 10..15 {
        SessionLogic::start(&ctx, date(2025, 1, day), p.at(date(2025, 1, day), hm(9, 0)), None)
            .unwrap();
    }

    let history = SessionLogic::history(&ctx, 3).unwrap();
    let dates: Vec<_> = history.iter().map(|s| s.date).collect();

    assert_eq!(dates, vec![date(2025, 1, 14), date(2025, 1, 13), date(2025, 1, 12)]);
}
