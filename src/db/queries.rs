use crate::errors::AppError;
use crate::models::club::Club;
use crate::models::coordinates::Coordinates;
use crate::models::identity::Identity;
use crate::models::member::Member;
use crate::models::session_state::SessionState;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const MEMBER_COLUMNS: &str =
    "id, club_id, name, identity_kind, identity, attendance, is_admin, last_check_in, created_at";

// ---------------------------------------------------------------------------
// Row mappers
// ---------------------------------------------------------------------------

pub fn map_club_row(row: &Row) -> Result<Club> {
    Ok(Club {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_member_row(row: &Row) -> Result<Member> {
    let kind: String = row.get("identity_kind")?;
    let value: String = row.get("identity")?;

    let identity = Identity::from_db(&kind, &value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInput(format!(
                "Invalid identity kind: {}",
                kind
            ))),
        )
    })?;

    Ok(Member {
        id: row.get("id")?,
        club_id: row.get("club_id")?,
        name: row.get("name")?,
        identity,
        attendance: row.get("attendance")?,
        is_admin: row.get::<_, i32>("is_admin")? == 1,
        last_check_in: row.get("last_check_in")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_session_row(row: &Row) -> Result<SessionState> {
    Ok(SessionState {
        club_id: row.get("club_id")?,
        accepting: row.get::<_, i32>("accepting")? == 1,
        anchor: Coordinates {
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        },
        updated_at: row.get("updated_at")?,
    })
}

// ---------------------------------------------------------------------------
// Clubs
// ---------------------------------------------------------------------------

pub fn insert_club(conn: &Connection, name: &str, created_at: &str) -> Result<Club> {
    conn.query_row(
        "INSERT INTO clubs (name, created_at) VALUES (?1, ?2)
         RETURNING id, name, created_at",
        params![name, created_at],
        map_club_row,
    )
}

pub fn find_club_by_name(conn: &Connection, name: &str) -> Result<Option<Club>> {
    conn.query_row(
        "SELECT id, name, created_at FROM clubs WHERE name = ?1",
        [name],
        map_club_row,
    )
    .optional()
}

pub fn list_clubs(conn: &Connection) -> Result<Vec<Club>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM clubs ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_club_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Returns `(members, admins)` for a club.
pub fn count_members(conn: &Connection, club_id: i64) -> Result<(i64, i64)> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(is_admin), 0) FROM members WHERE club_id = ?1",
        [club_id],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

pub fn insert_member(
    conn: &Connection,
    club_id: i64,
    name: &str,
    identity: &Identity,
    is_admin: bool,
    created_at: &str,
) -> Result<Member> {
    let sql = format!(
        "INSERT INTO members (club_id, name, identity_kind, identity, attendance, is_admin, created_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)
         RETURNING {}",
        MEMBER_COLUMNS
    );
    conn.query_row(
        &sql,
        params![
            club_id,
            name,
            identity.kind(),
            identity.value(),
            if is_admin { 1 } else { 0 },
            created_at,
        ],
        map_member_row,
    )
}

pub fn find_member(conn: &Connection, club_id: i64, identity: &Identity) -> Result<Option<Member>> {
    let sql = format!(
        "SELECT {} FROM members WHERE club_id = ?1 AND identity = ?2",
        MEMBER_COLUMNS
    );
    conn.query_row(&sql, params![club_id, identity.value()], map_member_row)
        .optional()
}

/// Members of one club (or of every club when `club_id` is `None`), ordered by id.
pub fn list_members(conn: &Connection, club_id: Option<i64>) -> Result<Vec<Member>> {
    let mut out = Vec::new();

    match club_id {
        Some(id) => {
            let sql = format!(
                "SELECT {} FROM members WHERE club_id = ?1 ORDER BY id ASC",
                MEMBER_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            for r in stmt.query_map([id], map_member_row)? {
                out.push(r?);
            }
        }
        None => {
            let sql = format!("SELECT {} FROM members ORDER BY id ASC", MEMBER_COLUMNS);
            let mut stmt = conn.prepare(&sql)?;
            for r in stmt.query_map([], map_member_row)? {
                out.push(r?);
            }
        }
    }

    Ok(out)
}

/// Returns the updated member, or `None` when the identity is unknown in the club.
pub fn set_member_admin(
    conn: &Connection,
    club_id: i64,
    identity: &Identity,
    is_admin: bool,
) -> Result<Option<Member>> {
    let sql = format!(
        "UPDATE members SET is_admin = ?1
         WHERE club_id = ?2 AND identity = ?3
         RETURNING {}",
        MEMBER_COLUMNS
    );
    conn.query_row(
        &sql,
        params![if is_admin { 1 } else { 0 }, club_id, identity.value()],
        map_member_row,
    )
    .optional()
}

/// Single-statement increment: `attendance = attendance + 1`.
/// Returns `None` when the identity has no member row in the club.
pub fn increment_attendance(
    conn: &Connection,
    club_id: i64,
    identity: &Identity,
    checked_in_at: &str,
) -> Result<Option<Member>> {
    let sql = format!(
        "UPDATE members
         SET attendance = attendance + 1, last_check_in = ?1
         WHERE club_id = ?2 AND identity = ?3
         RETURNING {}",
        MEMBER_COLUMNS
    );
    conn.query_row(
        &sql,
        params![checked_in_at, club_id, identity.value()],
        map_member_row,
    )
    .optional()
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

pub fn load_session_state(conn: &Connection, club_id: i64) -> Result<Option<SessionState>> {
    conn.query_row(
        "SELECT club_id, accepting, latitude, longitude, updated_at
         FROM session_states WHERE club_id = ?1",
        [club_id],
        map_session_row,
    )
    .optional()
}

/// Atomic read-modify-write of a club's session state.
///
/// The first call for a club creates the row with `accepting = 1`; later calls
/// flip the flag. The anchor is overwritten every time.
pub fn toggle_session_state(
    conn: &Connection,
    club_id: i64,
    anchor: &Coordinates,
    updated_at: &str,
) -> Result<SessionState> {
    conn.query_row(
        "INSERT INTO session_states (club_id, accepting, latitude, longitude, updated_at)
         VALUES (?1, 1, ?2, ?3, ?4)
         ON CONFLICT(club_id) DO UPDATE SET
             accepting  = 1 - session_states.accepting,
             latitude   = excluded.latitude,
             longitude  = excluded.longitude,
             updated_at = excluded.updated_at
         RETURNING club_id, accepting, latitude, longitude, updated_at",
        params![club_id, anchor.latitude, anchor.longitude, updated_at],
        map_session_row,
    )
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

pub fn load_log(conn: &Connection) -> Result<Vec<(i64, String, String, String, String)>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, operation, COALESCE(target, ''), message FROM log ORDER BY id ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
