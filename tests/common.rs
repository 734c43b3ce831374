#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rovertime::core::clock::{FixedClock, TimePolicy};
use rovertime::core::context::AppContext;
use rovertime::db::pool::DbPool;
use rovertime::errors::{AppError, AppResult};
use rovertime::mail::{Mailer, OutgoingEmail};
use rovertime::models::schedule::ScheduleEntry;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub fn rti() -> Command {
    cargo_bin_cmd!("rovertime")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rovertime.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a DB through the CLI
pub fn init_db(db_path: &str) {
    rti()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Mailer that keeps every message it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Mailer whose transport always fails.
pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _email: &OutgoingEmail) -> AppResult<()> {
        Err(AppError::Transport("connection refused".to_string()))
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn entry(d: NaiveDate, start: NaiveTime, end: NaiveTime) -> ScheduleEntry {
    ScheduleEntry::new(d, start, end)
}

/// In-memory context with a frozen clock and a custom mailer.
pub fn ctx_with(now: DateTime<Utc>, mailer: Box<dyn Mailer>) -> AppContext {
    let pool = DbPool::in_memory().expect("open in-memory db");
    AppContext::new(
        pool,
        mailer,
        Box::new(FixedClock(now)),
        TimePolicy::organization(),
    )
    .expect("build context")
}

/// In-memory context plus a handle on the mails it sends.
pub fn recording_ctx(now: DateTime<Utc>) -> (AppContext, Arc<Mutex<Vec<OutgoingEmail>>>) {
    let mailer = RecordingMailer::default();
    let sent = Arc::clone(&mailer.sent);
    (ctx_with(now, Box::new(mailer)), sent)
}
