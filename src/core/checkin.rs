use crate::core::clubs::require_club;
use crate::core::geofence::Geofence;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::coordinates::Coordinates;
use crate::models::identity::Identity;
use crate::models::outcome::CheckInOutcome;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::TransactionBehavior;

pub struct CheckInLogic;

impl CheckInLogic {
    /// Evaluate a check-in against the club's session anchor.
    ///
    /// - no club / no session state → `NotFound`
    /// - session closed → `Closed`, nothing written
    /// - farther than `radius_m` → `Rejected` with the distance, nothing written
    /// - otherwise the member's counter is incremented → `Accepted`
    ///   (`NotFound` if the identity is not a member of the club)
    ///
    /// The session read and the counter update share one `BEGIN IMMEDIATE`
    /// transaction, so a concurrent toggle-off either lands before the read
    /// or waits for the commit.
    pub fn check_in(
        pool: &mut DbPool,
        club: &str,
        identity: &Identity,
        point: Coordinates,
        at: DateTime<Utc>,
        radius_m: f64,
    ) -> AppResult<CheckInOutcome> {
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let club = require_club(&tx, club)?;
        let state = queries::load_session_state(&tx, club.id)?.ok_or_else(|| {
            AppError::NotFound(format!("Session state for club '{}'", club.name))
        })?;

        if !state.accepting {
            return Ok(CheckInOutcome::Closed);
        }

        let fence = Geofence::new(state.anchor, radius_m);
        let distance_m = fence.distance_to(&point);

        if !fence.admits(distance_m) {
            return Ok(CheckInOutcome::Rejected {
                distance_m,
                radius_m,
            });
        }

        let stamp = at.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let member = queries::increment_attendance(&tx, club.id, identity, &stamp)?
            .ok_or_else(|| {
                AppError::NotFound(format!("Member {} in club '{}'", identity, club.name))
            })?;
        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "checkin",
            &format!("{}/{}", club.name, identity),
            &format!(
                "Attendance {} ({:.1} m from anchor)",
                member.attendance, distance_m
            ),
        );

        Ok(CheckInOutcome::Accepted { member, distance_m })
    }
}
