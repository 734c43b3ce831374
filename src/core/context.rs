//! Application context: everything an operation needs, built once at startup.

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock, TimePolicy};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::mail::Mailer;
use crate::mail::smtp::SmtpMailer;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Mutex;
use std::time::Duration;

pub struct AppContext {
    db: Mutex<DbPool>,
    mailer: Box<dyn Mailer>,
    clock: Box<dyn Clock>,
    policy: TimePolicy,
}

impl AppContext {
    /// Wrap an open pool and bring its schema up to date.
    pub fn new(
        pool: DbPool,
        mailer: Box<dyn Mailer>,
        clock: Box<dyn Clock>,
        policy: TimePolicy,
    ) -> AppResult<Self> {
        init_db(&pool.conn)?;

        Ok(Self {
            db: Mutex::new(pool),
            mailer,
            clock,
            policy,
        })
    }

    /// Production wiring: database file, SMTP mailer, system clock.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::open(
            &cfg.database,
            Duration::from_millis(cfg.db_busy_timeout_ms),
        )?;
        let policy = TimePolicy::from_offset_hours(cfg.organization_utc_offset_hours)?;

        Self::new(
            pool,
            Box::new(SmtpMailer::from_config(cfg)),
            Box::new(SystemClock),
            policy,
        )
    }

    /// Run `f` with exclusive access to the database.
    pub fn with_db<T>(&self, f: impl FnOnce(&mut DbPool) -> AppResult<T>) -> AppResult<T> {
        let mut guard = self
            .db
            .lock()
            .map_err(|_| AppError::Other("database lock poisoned".to_string()))?;
        f(&mut guard)
    }

    pub fn mailer(&self) -> &dyn Mailer {
        self.mailer.as_ref()
    }

    pub fn policy(&self) -> &TimePolicy {
        &self.policy
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    /// Current instant in the organizational offset.
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.policy.now(self.clock.as_ref())
    }
}
