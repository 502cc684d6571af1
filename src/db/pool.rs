//! SQLite connection wrapper (lightweight for CLI usage).

use crate::db::db_utils::table_exists;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OpenFlags, Result};
use std::path::Path;
use std::time::Duration;

pub struct DbPool {
    pub conn: Connection,
}

fn configure(conn: &Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

fn not_initialized(path: &str) -> AppError {
    AppError::Config(format!(
        "database {} is not initialized; run `rattendance init`",
        path
    ))
}

impl DbPool {
    /// Open (and create if missing) the database file. Used by `init`.
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Open an existing database file without creating it.
    pub fn open_existing(path: &str) -> AppResult<Self> {
        if !Path::new(path).is_file() {
            return Err(not_initialized(path));
        }

        let conn = Connection::open_with_flags(
            Path::new(path),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Open a database that already carries the attendance schema.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = Self::open_existing(path)?;
        if !table_exists(&pool.conn, "clubs")? {
            return Err(not_initialized(path));
        }
        Ok(pool)
    }
}
