use crate::core::clubs::require_club;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::identity::Identity;
use crate::models::session_state::SessionState;
use chrono::Local;
use rusqlite::TransactionBehavior;

pub struct SessionLogic;

impl SessionLogic {
    /// Flip the club's "accepting check-ins" flag and re-anchor the session.
    ///
    /// Only an admin member of the club may toggle. The admin check and the
    /// flip run inside one `BEGIN IMMEDIATE` transaction, and the flip itself
    /// is a single upsert, so concurrent toggles serialize on the write lock.
    pub fn toggle(
        pool: &mut DbPool,
        club: &str,
        admin: &Identity,
        anchor: Coordinates,
    ) -> AppResult<bool> {
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let club = require_club(&tx, club)?;

        match queries::find_member(&tx, club.id, admin)? {
            Some(m) if m.is_admin => {}
            _ => {
                return Err(AppError::Permission(format!(
                    "{} is not an admin of club '{}'",
                    admin, club.name
                )));
            }
        }

        let now = Local::now().to_rfc3339();
        let state = queries::toggle_session_state(&tx, club.id, &anchor, &now)?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            if state.accepting {
                "session_open"
            } else {
                "session_close"
            },
            &club.name,
            &format!("Toggled by {} at {}", admin, anchor),
        );

        Ok(state.accepting)
    }

    /// Current "accepting check-ins" flag.
    pub fn query(pool: &mut DbPool, club: &str) -> AppResult<bool> {
        Ok(Self::snapshot(pool, club)?.accepting)
    }

    /// Full session state: flag, anchor and last update.
    pub fn snapshot(pool: &mut DbPool, club: &str) -> AppResult<SessionState> {
        let club = require_club(&pool.conn, club)?;
        queries::load_session_state(&pool.conn, club.id)?.ok_or_else(|| {
            AppError::NotFound(format!("Session state for club '{}'", club.name))
        })
    }
}
