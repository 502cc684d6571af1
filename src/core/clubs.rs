use crate::db::db_utils::is_unique_violation;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::club::{Club, ClubOverview};
use chrono::Local;
use rusqlite::Connection;

/// Look up a club by name, failing with `NotFound`.
pub fn require_club(conn: &Connection, name: &str) -> AppResult<Club> {
    let name = Club::normalize_name(name);
    queries::find_club_by_name(conn, &name)?
        .ok_or_else(|| AppError::NotFound(format!("Club '{}'", name)))
}

pub struct ClubLogic;

impl ClubLogic {
    pub fn create(pool: &mut DbPool, name: &str) -> AppResult<Club> {
        let name = Club::normalize_name(name);
        if name.is_empty() {
            return Err(AppError::InvalidInput("club name cannot be empty".into()));
        }

        let now = Local::now().to_rfc3339();
        let club = queries::insert_club(&pool.conn, &name, &now).map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("club '{}'", name))
            } else {
                AppError::from(e)
            }
        })?;

        ttlog_quiet(&pool.conn, "club_add", &club.name, "Club created");
        Ok(club)
    }

    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Club>> {
        Ok(queries::list_clubs(&pool.conn)?)
    }

    pub fn overview(pool: &mut DbPool, name: &str) -> AppResult<ClubOverview> {
        let club = require_club(&pool.conn, name)?;
        let (members, admins) = queries::count_members(&pool.conn, club.id)?;
        let accepting = queries::load_session_state(&pool.conn, club.id)?.map(|s| s.accepting);

        Ok(ClubOverview {
            club,
            members,
            admins,
            accepting,
        })
    }
}
