mod common;
use common::{FailingMailer, ctx_with, date, entry, hm, recording_ctx, utc};
use rovertime::core::context::AppContext;
use rovertime::core::report::{ReportLogic, compose, render_template};
use rovertime::core::schedule::ScheduleLogic;
use rovertime::core::session::SessionLogic;
use rovertime::core::settings::SettingsLogic;
use rovertime::errors::{AppError, ErrorKind};
use rovertime::models::settings::{DEFAULT_EMAIL_SUBJECT, Settings, SettingsUpdate};
use rovertime::utils::blob::encode_base64;

/// Ended session on 2025-01-15 with 12 minutes of overtime (09:00-17:00 scheduled).
fn ended_session(ctx: &AppContext) -> String {
    ScheduleLogic::upload_manual(ctx, vec![entry(date(2025, 1, 15), hm(9, 0), hm(17, 0))])
        .unwrap();
    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(ctx, date(2025, 1, 15), start, None).unwrap();
    SessionLogic::end(ctx, &session.id, None).unwrap();
    session.id
}

fn set_recipient(ctx: &AppContext, to: &str) {
    SettingsLogic::update(
        ctx,
        SettingsUpdate {
            recipient_email: Some(to.to_string()),
            ..Default::default()
        },
    )
    .unwrap();
}

#[test]
fn test_render_template_substitutes_known_names() {
    let out = render_template(
        "Date {date}, overtime {overtime_hours} h ({overtime_minutes} min)",
        &[
            ("date", "2025-01-15".to_string()),
            ("overtime_hours", "0.20".to_string()),
            ("overtime_minutes", "12".to_string()),
        ],
    );
    assert_eq!(out, "Date 2025-01-15, overtime 0.20 h (12 min)");
}

#[test]
fn test_render_template_keeps_unknown_and_unbalanced_braces() {
    let out = render_template(
        "{greeting} {date} {unclosed",
        &[("date", "2025-01-15".to_string())],
    );
    assert_eq!(out, "{greeting} 2025-01-15 {unclosed");
}

#[test]
fn test_compose_fills_default_template() {
    let (ctx, _sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);
    SessionLogic::add_photo(&ctx, &id, &encode_base64(b"jpeg-bytes")).unwrap();

    let session = SessionLogic::get(&ctx, &id).unwrap();
    let settings = Settings {
        recipient_email: "boss@example.com".to_string(),
        ..Settings::default()
    };

    let email = compose(&session, &settings).unwrap();

    assert_eq!(email.to, "boss@example.com");
    assert_eq!(email.subject, DEFAULT_EMAIL_SUBJECT);
    assert!(email.html_body.contains("2025-01-15"));
    assert!(email.html_body.contains("09:00"));
    assert!(email.html_body.contains("17:12"));
    assert!(email.html_body.contains("0.20"));
    assert!(email.html_body.contains("(12 min.)"));
    assert!(email.html_body.contains("Pridėtos 1 darbo nuotraukos"));
}

#[test]
fn test_end_time_follows_settings_offset() {
    let (ctx, _sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);
    let session = SessionLogic::get(&ctx, &id).unwrap();

    let settings = Settings {
        recipient_email: "boss@example.com".to_string(),
        email_body_template: "{end_time}".to_string(),
        timezone_offset_hours: 3,
        ..Settings::default()
    };

    assert_eq!(compose(&session, &settings).unwrap().html_body, "18:12");
}

#[test]
fn test_photo_attachments_skip_undecodable_payloads_and_stay_sequential() {
    let (ctx, _sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);

    let first = format!("data:image/jpeg;base64,{}", encode_base64(b"one"));
    SessionLogic::add_photo(&ctx, &id, &first).unwrap();
    SessionLogic::add_photo(&ctx, &id, "@@@ not base64 @@@").unwrap();
    SessionLogic::add_photo(&ctx, &id, &encode_base64(b"three")).unwrap();

    let session = SessionLogic::get(&ctx, &id).unwrap();
    let settings = Settings {
        recipient_email: "boss@example.com".to_string(),
        ..Settings::default()
    };
    let email = compose(&session, &settings).unwrap();

    let names: Vec<_> = email.attachments.iter().map(|a| a.filename.as_str()).collect();
    assert_eq!(names, vec!["photo_1.jpg", "photo_2.jpg"]);
    assert_eq!(email.attachments[0].data, b"one".to_vec());
    assert_eq!(email.attachments[1].data, b"three".to_vec());
    assert_eq!(email.attachments[1].content_type, "image/jpeg");
    // the placeholder still counts every stored photo
    assert!(email.html_body.contains("Pridėtos 3 darbo nuotraukos"));
}

#[test]
fn test_send_marks_session_and_records_mail() {
    let (ctx, sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);
    set_recipient(&ctx, "boss@example.com");

    let session = ReportLogic::send(&ctx, &id).unwrap();
    assert!(session.email_sent);
    assert!(SessionLogic::get(&ctx, &id).unwrap().email_sent);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "boss@example.com");
}

#[test]
fn test_send_can_be_repeated() {
    let (ctx, sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);
    set_recipient(&ctx, "boss@example.com");

    ReportLogic::send(&ctx, &id).unwrap();
    ReportLogic::send(&ctx, &id).unwrap();

    assert_eq!(sent.lock().unwrap().len(), 2);
    assert!(SessionLogic::get(&ctx, &id).unwrap().email_sent);
}

#[test]
fn test_transport_failure_keeps_flag_unset() {
    let ctx = ctx_with(utc(2025, 1, 15, 15, 12), Box::new(FailingMailer));
    let id = ended_session(&ctx);
    set_recipient(&ctx, "boss@example.com");

    let err = ReportLogic::send(&ctx, &id).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status(), 500);
    assert!(!SessionLogic::get(&ctx, &id).unwrap().email_sent);
}

#[test]
fn test_send_without_recipient_is_rejected() {
    let (ctx, sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    let id = ended_session(&ctx);

    let err = ReportLogic::send(&ctx, &id).unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(sent.lock().unwrap().is_empty());
}

#[test]
fn test_send_for_active_session_is_rejected() {
    let (ctx, sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    set_recipient(&ctx, "boss@example.com");
    let start = ctx.policy().at(date(2025, 1, 15), hm(9, 0));
    let session = SessionLogic::start(&ctx, date(2025, 1, 15), start, None).unwrap();

    let err = ReportLogic::send(&ctx, &session.id).unwrap_err();

    assert_eq!(err.status(), 400);
    assert!(sent.lock().unwrap().is_empty());
}

#[test]
fn test_send_unknown_session_is_not_found() {
    let (ctx, _sent) = recording_ctx(utc(2025, 1, 15, 15, 12));
    set_recipient(&ctx, "boss@example.com");

    let err = ReportLogic::send(&ctx, "missing").unwrap_err();
    assert!(matches!(err, AppError::SessionNotFound(_)));
}
