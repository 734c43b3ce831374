//! Route handlers: decode the request, call the library, encode the result.

use super::error::{ApiResult, AppJson};
use crate::core::context::AppContext;
use crate::core::report::ReportLogic;
use crate::core::schedule::{ReferenceMonth, ScheduleLogic};
use crate::core::session::{DEFAULT_HISTORY_LIMIT, SessionEdit, SessionLogic};
use crate::core::settings::SettingsLogic;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::ScheduleEntry;
use crate::models::session::GeoPoint;
use crate::models::settings::SettingsUpdate;
use crate::utils::date::parse_date_arg;
use crate::utils::time::parse_time_arg;
use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

pub type SharedContext = Arc<AppContext>;

/// Run a blocking library call on tokio's blocking pool.
async fn blocking<T, F>(ctx: &SharedContext, f: F) -> ApiResult<T>
where
    F: FnOnce(&AppContext) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let ctx = Arc::clone(ctx);
    tokio::task::spawn_blocking(move || f(&ctx))
        .await
        .map_err(|e| AppError::Other(format!("worker task failed: {e}")))?
}

fn location(latitude: Option<f64>, longitude: Option<f64>) -> Option<GeoPoint> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(GeoPoint {
            latitude,
            longitude,
        }),
        _ => None,
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Overtime Tracking API" }))
}

// ---------------------------
// Schedule
// ---------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    #[serde(alias = "file_base64")]
    pub file_base64: String,
    pub filename: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

pub async fn upload_file(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<UploadFileRequest>,
) -> ApiResult<Json<Value>> {
    let schedule = blocking(&ctx, move |ctx| {
        let reference = ReferenceMonth {
            year: req.year,
            month: req.month,
        };
        ScheduleLogic::upload_file(ctx, &req.file_base64, &req.filename, reference)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": schedule.entries.len(),
        "schedule": schedule,
    })))
}

/// Raw manual entry; validated by the handler so bad values map to 400.
#[derive(Debug, Deserialize)]
pub struct ManualEntry {
    pub date: String,
    pub start: String,
    pub end: String,
}

impl ManualEntry {
    fn into_entry(self) -> AppResult<ScheduleEntry> {
        Ok(ScheduleEntry::new(
            parse_date_arg(&self.date)?,
            parse_time_arg(&self.start)?,
            parse_time_arg(&self.end)?,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct ManualRequest {
    #[serde(alias = "work_days", alias = "workDays")]
    pub entries: Vec<ManualEntry>,
}

pub async fn upload_manual(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<ManualRequest>,
) -> ApiResult<Json<Value>> {
    let schedule = blocking(&ctx, move |ctx| {
        let entries = req
            .entries
            .into_iter()
            .map(ManualEntry::into_entry)
            .collect::<AppResult<Vec<_>>>()?;
        ScheduleLogic::upload_manual(ctx, entries)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "count": schedule.entries.len(),
        "schedule": schedule,
    })))
}

pub async fn current_schedule(State(ctx): State<SharedContext>) -> ApiResult<Json<Value>> {
    let schedule = blocking(&ctx, ScheduleLogic::current).await?;
    Ok(Json(json!({ "schedule": schedule })))
}

pub async fn delete_schedule(
    State(ctx): State<SharedContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    blocking(&ctx, move |ctx| ScheduleLogic::delete(ctx, &id)).await?;
    Ok(Json(json!({ "success": true })))
}

// ---------------------------
// Sessions
// ---------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(alias = "start_timestamp", alias = "startTime", alias = "start_time")]
    pub start_timestamp: Option<String>,
}

pub async fn start_session(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<StartRequest>,
) -> ApiResult<Json<Value>> {
    let session = blocking(&ctx, move |ctx| {
        let start = match req.start_timestamp.as_deref() {
            Some(raw) => ctx.policy().parse_timestamp(raw)?,
            None => ctx.now(),
        };
        let date = match req.date.as_deref() {
            Some(raw) => parse_date_arg(raw)?,
            None => start.with_timezone(&ctx.policy().offset()).date_naive(),
        };
        SessionLogic::start(ctx, date, start, location(req.latitude, req.longitude))
    })
    .await?;

    Ok(Json(json!({ "success": true, "session": session })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndRequest {
    #[serde(alias = "session_id")]
    pub session_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub async fn end_session(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<EndRequest>,
) -> ApiResult<Json<Value>> {
    let session = blocking(&ctx, move |ctx| {
        SessionLogic::end(ctx, &req.session_id, location(req.latitude, req.longitude))
    })
    .await?;

    Ok(Json(json!({ "success": true, "session": session })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(alias = "session_id")]
    pub session_id: String,
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(default, alias = "end_time")]
    pub end_time: Option<String>,
    pub date: String,
}

pub async fn edit_session(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<EditRequest>,
) -> ApiResult<Json<Value>> {
    let session = blocking(&ctx, move |ctx| {
        let policy = ctx.policy();
        let edit = SessionEdit {
            start: policy.parse_timestamp(&req.start_time)?,
            end: req
                .end_time
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| policy.parse_timestamp(s))
                .transpose()?,
            date: parse_date_arg(&req.date)?,
        };
        SessionLogic::edit(ctx, &req.session_id, edit)
    })
    .await?;

    Ok(Json(json!({ "success": true, "session": session })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRequest {
    #[serde(alias = "session_id")]
    pub session_id: String,
    #[serde(alias = "photo_base64")]
    pub photo_base64: String,
}

pub async fn add_photo(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<PhotoRequest>,
) -> ApiResult<Json<Value>> {
    let count = blocking(&ctx, move |ctx| {
        SessionLogic::add_photo(ctx, &req.session_id, &req.photo_base64)
    })
    .await?;

    Ok(Json(json!({ "success": true, "photo_count": count })))
}

pub async fn active_session(State(ctx): State<SharedContext>) -> ApiResult<Json<Value>> {
    let session = blocking(&ctx, SessionLogic::active).await?;
    Ok(Json(json!({ "session": session })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn history(
    State(ctx): State<SharedContext>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let limit = q.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let sessions = blocking(&ctx, move |ctx| SessionLogic::history(ctx, limit)).await?;
    Ok(Json(json!({ "sessions": sessions })))
}

// ---------------------------
// Settings & email
// ---------------------------

pub async fn get_settings(State(ctx): State<SharedContext>) -> ApiResult<Json<Value>> {
    let settings = blocking(&ctx, SettingsLogic::get).await?;
    Ok(Json(json!({ "settings": settings })))
}

pub async fn update_settings(
    State(ctx): State<SharedContext>,
    AppJson(patch): AppJson<SettingsUpdate>,
) -> ApiResult<Json<Value>> {
    let settings = blocking(&ctx, move |ctx| SettingsLogic::update(ctx, patch)).await?;
    Ok(Json(json!({ "success": true, "settings": settings })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(alias = "session_id")]
    pub session_id: String,
}

pub async fn send_email(
    State(ctx): State<SharedContext>,
    AppJson(req): AppJson<SendRequest>,
) -> ApiResult<Json<Value>> {
    blocking(&ctx, move |ctx| ReportLogic::send(ctx, &req.session_id)).await?;
    Ok(Json(json!({ "success": true, "message": "Email sent successfully" })))
}
