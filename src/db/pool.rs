//! SQLite connection wrapper (one connection, guarded by the application context).

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::prepare(conn)
    }

    /// Open a database file waiting up to `busy_timeout` on locked tables.
    pub fn open(path: &str, busy_timeout: Duration) -> Result<Self> {
        let pool = Self::new(path)?;
        pool.conn.busy_timeout(busy_timeout)?;
        Ok(pool)
    }

    /// Private in-memory database (tests, dry runs).
    pub fn in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }
}
