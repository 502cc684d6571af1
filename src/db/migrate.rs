//! Schema migrations.
//!
//! Every migration is identified by a version string and recorded in the
//! `log` table (`operation = 'migration_applied'`, `target = version`), so
//! running the engine twice is a no-op.

use crate::db::db_utils::table_exists;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension};

type MigrationFn = fn(&Connection) -> rusqlite::Result<()>;

/// Ordered list of schema migrations.
const MIGRATIONS: &[(&str, &str, MigrationFn)] = &[
    (
        "20260301_0001_create_clubs",
        "Created clubs table",
        create_clubs_table,
    ),
    (
        "20260301_0002_create_members",
        "Created members table",
        create_members_table,
    ),
    (
        "20260301_0003_create_session_states",
        "Created session_states table",
        create_session_states_table,
    ),
];

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn create_clubs_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS clubs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL
        );
        "#,
    )
}

fn create_members_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            club_id        INTEGER NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
            name           TEXT NOT NULL,
            identity_kind  TEXT NOT NULL CHECK(identity_kind IN ('email','phone')),
            identity       TEXT NOT NULL,
            attendance     INTEGER NOT NULL DEFAULT 0 CHECK(attendance >= 0),
            is_admin       INTEGER NOT NULL DEFAULT 0 CHECK(is_admin IN (0,1)),
            last_check_in  TEXT,
            created_at     TEXT NOT NULL,
            UNIQUE(club_id, identity)
        );

        CREATE INDEX IF NOT EXISTS idx_members_club ON members(club_id);
        "#,
    )
}

fn create_session_states_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS session_states (
            club_id     INTEGER PRIMARY KEY REFERENCES clubs(id) ON DELETE CASCADE,
            accepting   INTEGER NOT NULL DEFAULT 0 CHECK(accepting IN (0,1)),
            latitude    REAL NOT NULL,
            longitude   REAL NOT NULL,
            updated_at  TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Versions already recorded in the `log` table, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    if !table_exists(conn, "log")? {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Each migration runs in its own transaction together with the row that
/// marks it as applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    for (version, message, apply) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;

        apply(&tx).map_err(|e| AppError::Migration(format!("{}: {}", version, e)))?;

        tx.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [version, message],
        )?;

        tx.commit()?;

        success(format!("Migration applied: {} → {}", version, message));
    }

    Ok(())
}
