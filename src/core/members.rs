use crate::core::clubs::require_club;
use crate::db::db_utils::is_unique_violation;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::identity::Identity;
use crate::models::member::Member;
use chrono::Local;
use serde::Deserialize;
use std::path::Path;

/// One row of a batch registration file (`name,identity[,is_admin]`).
#[derive(Debug, Deserialize)]
struct BatchRow {
    name: String,
    identity: String,
    #[serde(default)]
    is_admin: bool,
}

fn conflict_or_db(e: rusqlite::Error, club: &str, identity: &Identity) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(format!("member {} in club '{}'", identity, club))
    } else {
        AppError::from(e)
    }
}

pub struct MemberLogic;

impl MemberLogic {
    /// Member record for `identity` in `club`.
    pub fn resolve(pool: &mut DbPool, club: &str, identity: &Identity) -> AppResult<Member> {
        let club = require_club(&pool.conn, club)?;
        queries::find_member(&pool.conn, club.id, identity)?.ok_or_else(|| {
            AppError::NotFound(format!("Member {} in club '{}'", identity, club.name))
        })
    }

    /// Register a new, non-admin member with a zero attendance counter.
    pub fn register(
        pool: &mut DbPool,
        club: &str,
        identity: &Identity,
        display_name: &str,
    ) -> AppResult<Member> {
        let club = require_club(&pool.conn, club)?;
        let name = display_name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("display name cannot be empty".into()));
        }

        let now = Local::now().to_rfc3339();
        let member = queries::insert_member(&pool.conn, club.id, name, identity, false, &now)
            .map_err(|e| conflict_or_db(e, &club.name, identity))?;

        ttlog_quiet(
            &pool.conn,
            "member_add",
            &format!("{}/{}", club.name, identity),
            &format!("Registered member '{}'", member.name),
        );
        Ok(member)
    }

    /// Register every row of a CSV file in one transaction.
    /// Any invalid or duplicate row rolls back the whole batch.
    pub fn register_batch(pool: &mut DbPool, club: &str, file: &Path) -> AppResult<Vec<Member>> {
        let club = require_club(&pool.conn, club)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(file)?;

        let mut rows = Vec::new();
        for r in rdr.deserialize::<BatchRow>() {
            let row = r?;
            let identity = Identity::parse(&row.identity)?;
            if row.name.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "missing name for {} in {}",
                    identity,
                    file.display()
                )));
            }
            rows.push((row.name, identity, row.is_admin));
        }

        let now = Local::now().to_rfc3339();
        let tx = pool.conn.transaction()?;

        let mut created = Vec::with_capacity(rows.len());
        for (name, identity, is_admin) in &rows {
            let m = queries::insert_member(&tx, club.id, name, identity, *is_admin, &now)
                .map_err(|e| conflict_or_db(e, &club.name, identity))?;
            created.push(m);
        }

        tx.commit()?;

        ttlog_quiet(
            &pool.conn,
            "member_import",
            &club.name,
            &format!("Imported {} members from {}", created.len(), file.display()),
        );
        Ok(created)
    }

    /// Operator-level promotion / demotion.
    pub fn set_admin(
        pool: &mut DbPool,
        club: &str,
        identity: &Identity,
        is_admin: bool,
    ) -> AppResult<Member> {
        let club = require_club(&pool.conn, club)?;
        let member = queries::set_member_admin(&pool.conn, club.id, identity, is_admin)?
            .ok_or_else(|| {
                AppError::NotFound(format!("Member {} in club '{}'", identity, club.name))
            })?;

        ttlog_quiet(
            &pool.conn,
            "member_admin",
            &format!("{}/{}", club.name, identity),
            if is_admin {
                "Granted admin"
            } else {
                "Revoked admin"
            },
        );
        Ok(member)
    }

    pub fn list(pool: &mut DbPool, club: &str) -> AppResult<Vec<Member>> {
        let club = require_club(&pool.conn, club)?;
        Ok(queries::list_members(&pool.conn, Some(club.id))?)
    }
}
