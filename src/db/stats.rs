use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregated figures shown by `db --info`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DbStats {
    pub clubs: i64,
    pub members: i64,
    pub admins: i64,
    pub open_sessions: i64,
    pub total_check_ins: i64,
    pub last_check_in: Option<String>,
}

pub fn collect_stats(pool: &DbPool) -> rusqlite::Result<DbStats> {
    let conn = &pool.conn;

    let clubs: i64 = conn.query_row("SELECT COUNT(*) FROM clubs", [], |row| row.get(0))?;

    let (members, admins, total_check_ins): (i64, i64, i64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(is_admin), 0), COALESCE(SUM(attendance), 0) FROM members",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let open_sessions: i64 = conn.query_row(
        "SELECT COUNT(*) FROM session_states WHERE accepting = 1",
        [],
        |row| row.get(0),
    )?;

    let last_check_in: Option<String> = conn
        .query_row(
            "SELECT MAX(last_check_in) FROM members WHERE last_check_in IS NOT NULL",
            [],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?
        .flatten();

    Ok(DbStats {
        clubs,
        members,
        admins,
        open_sessions,
        total_check_ins,
        last_check_in,
    })
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);

    //
    // 2) COUNTERS
    //
    let stats = collect_stats(pool)?;

    println!("{}• Clubs:{} {}{}{}", CYAN, RESET, GREEN, stats.clubs, RESET);
    println!(
        "{}• Members:{} {}{}{} ({} admins)",
        CYAN, RESET, GREEN, stats.members, RESET, stats.admins
    );
    println!(
        "{}• Open sessions:{} {}{}{}",
        CYAN, RESET, GREEN, stats.open_sessions, RESET
    );
    println!(
        "{}• Total check-ins:{} {}{}{}",
        CYAN, RESET, GREEN, stats.total_check_ins, RESET
    );

    //
    // 3) LAST ACTIVITY
    //
    let last = stats
        .last_check_in
        .unwrap_or_else(|| format!("{GREY}--{RESET}"));
    println!("{}• Last check-in:{} {}", CYAN, RESET, last);

    println!();
    Ok(())
}
