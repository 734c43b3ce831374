//! Unified application error type.
//! All modules (db, core, cli, server) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The uploaded table could not be mapped to day/start/end columns.
    #[error("Schedule parse error: {0}")]
    Parse(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Schedule not found: {0}")]
    ScheduleNotFound(String),

    // ---------------------------
    // External collaborators
    // ---------------------------
    #[error("Email transport error: {0}")]
    Transport(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Validation(format!("CSV read error: {e}"))
    }
}

impl From<calamine::Error> for AppError {
    fn from(e: calamine::Error) -> Self {
        AppError::Validation(format!("Spreadsheet read error: {e}"))
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(e: base64::DecodeError) -> Self {
        AppError::Validation(format!("Invalid base64 content: {e}"))
    }
}

/// Coarse error classes exposed to callers (HTTP status, CLI exit reason).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Transport,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidDate(_)
            | AppError::InvalidTime(_)
            | AppError::InvalidTimestamp(_)
            | AppError::Validation(_)
            | AppError::Parse(_) => ErrorKind::Validation,
            AppError::SessionNotFound(_) | AppError::ScheduleNotFound(_) => ErrorKind::NotFound,
            AppError::Transport(_) | AppError::Db(_) | AppError::Io(_) => ErrorKind::Transport,
            AppError::Migration(_)
            | AppError::Config(_)
            | AppError::Export(_)
            | AppError::Other(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status code equivalent of this error.
    pub fn status(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Transport | ErrorKind::Internal => 500,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
