use super::load_resolver;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::checkin::CheckInLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::identity::authenticate;
use crate::models::coordinates::Coordinates;
use crate::models::outcome::CheckInOutcome;
use crate::ui::messages::{success, warning};
use crate::utils::colors::{RESET, color_for_distance};
use crate::utils::format_distance;
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Checkin {
        club,
        token,
        point,
        json,
    } = cmd
    {
        let club = cfg.club_or_default(club)?;
        let point = Coordinates::parse(&point.lat, &point.lon)?;
        let who = authenticate(&load_resolver(cfg)?, token)?;

        let mut pool = DbPool::open(&cfg.database)?;
        let outcome = CheckInLogic::check_in(
            &mut pool,
            club,
            &who.identity,
            point,
            Utc::now(),
            cfg.geofence_radius_m,
        )?;

        if *json {
            let out = serde_json::to_string_pretty(&outcome)
                .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;
            println!("{}", out);
            return Ok(());
        }

        match &outcome {
            CheckInOutcome::Accepted { member, distance_m } => {
                let mut msg = format!(
                    "Check-in accepted for {}: attendance {}",
                    member.name, member.attendance
                );
                if cfg.show_distance {
                    msg.push_str(&format!(" ({} from anchor)", format_distance(*distance_m)));
                }
                success(msg);
            }
            CheckInOutcome::Rejected {
                distance_m,
                radius_m,
            } => {
                warning(format!(
                    "Check-in rejected: {}{}{} from anchor (limit {}).",
                    color_for_distance(*distance_m, *radius_m),
                    format_distance(*distance_m),
                    RESET,
                    format_distance(*radius_m)
                ));
            }
            CheckInOutcome::Closed => {
                warning(format!(
                    "Check-in rejected: attendance is closed for club '{}'.",
                    club
                ));
            }
        }
    }

    Ok(())
}
