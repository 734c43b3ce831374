//! Overtime report: template rendering and email dispatch.

use crate::core::context::AppContext;
use crate::core::settings::SettingsLogic;
use crate::db::log::ttlog;
use crate::db::sessions::{load_session, mark_email_sent};
use crate::errors::{AppError, AppResult};
use crate::mail::{Attachment, OutgoingEmail};
use crate::models::session::WorkSession;
use crate::models::settings::Settings;
use crate::utils::blob::decode_base64_payload;
use crate::utils::formatting::{hours_2dp, or_dash};
use crate::utils::time::format_time;
use chrono::FixedOffset;

const PHOTO_CONTENT_TYPE: &str = "image/jpeg";

/// Substitute `{name}` placeholders. Unknown names are kept verbatim.
pub fn render_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let replaced = tail.find('}').and_then(|close| {
            let key = &tail[1..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Placeholder values for a finished session.
pub fn report_values(session: &WorkSession, offset: FixedOffset) -> AppResult<Vec<(&'static str, String)>> {
    let end = session.end_time.ok_or_else(|| {
        AppError::Validation(format!("session {} has not ended yet", session.id))
    })?;
    let overtime = session.overtime_minutes.unwrap_or(0);

    Ok(vec![
        ("date", session.date.format("%Y-%m-%d").to_string()),
        ("start_time", or_dash(session.scheduled_start.map(format_time))),
        ("end_time", end.with_timezone(&offset).format("%H:%M").to_string()),
        ("overtime_hours", hours_2dp(overtime)),
        ("overtime_minutes", overtime.to_string()),
        ("photo_count", session.photo_count().to_string()),
    ])
}

/// Decodable photos as `photo_1.jpg`, `photo_2.jpg`, ... in stored order.
fn photo_attachments(session: &WorkSession) -> Vec<Attachment> {
    session
        .photos
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| match decode_base64_payload(raw) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("session {}: photo {} not attached: {e}", session.id, idx + 1);
                None
            }
        })
        .enumerate()
        .map(|(n, data)| Attachment {
            filename: format!("photo_{}.jpg", n + 1),
            content_type: PHOTO_CONTENT_TYPE.to_string(),
            data,
        })
        .collect()
}

/// Build the email for `session` without sending it.
pub fn compose(session: &WorkSession, settings: &Settings) -> AppResult<OutgoingEmail> {
    let recipient = settings.recipient_email.trim();
    if recipient.is_empty() {
        return Err(AppError::Validation(
            "no recipient email configured in settings".to_string(),
        ));
    }

    let offset = FixedOffset::east_opt(settings.timezone_offset_hours * 3600).ok_or_else(|| {
        AppError::Validation(format!(
            "invalid timezone offset in settings: {}",
            settings.timezone_offset_hours
        ))
    })?;

    let values = report_values(session, offset)?;

    Ok(OutgoingEmail {
        to: recipient.to_string(),
        subject: settings.email_subject.clone(),
        html_body: render_template(&settings.email_body_template, &values),
        attachments: photo_attachments(session),
    })
}

pub struct ReportLogic;

impl ReportLogic {
    /// Compose and dispatch the report, then flag the session as sent.
    ///
    /// The database lock is not held while the mail goes out; a failed
    /// dispatch leaves `email_sent` untouched.
    pub fn send(ctx: &AppContext, session_id: &str) -> AppResult<WorkSession> {
        let settings = SettingsLogic::get(ctx)?;
        let mut session = ctx.with_db(|pool| {
            load_session(&pool.conn, session_id)?
                .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))
        })?;

        let email = compose(&session, &settings)?;

        if let Err(e) = ctx.mailer().send(&email) {
            log::error!("report for session {session_id} not sent: {e}");
            return Err(e);
        }

        ctx.with_db(|pool| {
            let tx = pool.conn.transaction()?;
            mark_email_sent(&tx, session_id)?;
            ttlog(
                &tx,
                "email",
                session_id,
                &format!(
                    "report sent to {} with {} attachment(s)",
                    email.to,
                    email.attachments.len()
                ),
            )?;
            tx.commit()?;
            Ok(())
        })?;

        session.email_sent = true;
        Ok(session)
    }
}
